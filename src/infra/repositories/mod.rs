//! Repository layer - Data access abstraction
//!
//! Every repository borrows an open transaction and is handed out by the
//! unit of work's `TransactionContext`.

mod address_repository;
mod cart_repository;
pub(crate) mod entities;
mod product_repository;
mod user_repository;

pub use address_repository::{NewAddressRecord, TxAddressRepository};
pub use cart_repository::TxCartRepository;
pub use product_repository::{NewProductRecord, TxProductRepository};
pub use user_repository::{NewUserRecord, TxUserRepository};
