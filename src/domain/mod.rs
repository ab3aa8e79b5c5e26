//! Domain layer - Core business entities and logic
//!
//! Models for accounts, catalog, carts and addresses, independent of the
//! storage and HTTP layers.

pub mod address;
pub mod cart;
pub mod password;
pub mod product;
pub mod user;
pub mod validation;

pub use address::{Address, AddressResponse, NewAddress};
pub use cart::{CartItemChange, CartLine, CartLineResponse, CartResponse, CartSummary};
pub use password::Password;
pub use product::{NewProduct, Product, ProductResponse};
pub use user::{RegisterUser, User, UserResponse, UserRole};
