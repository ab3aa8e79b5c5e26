//! HTTP request handlers.

pub mod address_handler;
pub mod admin_handler;
pub mod auth_handler;
pub mod cart_handler;
pub mod product_handler;

pub use address_handler::address_routes;
pub use admin_handler::admin_routes;
pub use auth_handler::auth_routes;
pub use cart_handler::cart_routes;
pub use product_handler::product_routes;
