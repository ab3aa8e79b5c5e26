//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod address;
pub mod cart_item;
pub mod product;
pub mod user;
