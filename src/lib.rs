//! Merch API - storefront backend
//!
//! Catalog browsing, shopping carts with price snapshots, shipping
//! addresses and admin email, served over a JSON HTTP API.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core entities, validation and password hashing
//! - **services**: Catalog, cart, user, address and notification use cases
//! - **infra**: Database, repositories, unit of work and rate limiter
//! - **jobs**: Email job queue and worker handler
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Response envelope
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! merch-api serve
//!
//! # Run migrations
//! merch-api migrate up
//!
//! # Process queued emails
//! merch-api jobs work
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod jobs;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, User, UserRole};
pub use errors::{AppError, AppResult};
pub use infra::Database;
