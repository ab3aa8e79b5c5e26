//! HTTP surface.
//!
//! - Public catalog, signup and login
//! - Customer routes for carts and addresses (customer JWT)
//! - Admin routes for products, accounts and email (admin JWT)
//! - Rate limiting, validated JSON bodies and OpenAPI docs

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;
