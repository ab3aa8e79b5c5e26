//! Infrastructure layer - External systems integration
//!
//! - Database connection, migrations and repositories
//! - Unit of Work for transaction management
//! - Redis rate limiter

pub mod db;
pub mod rate_limiter;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use rate_limiter::RateLimiter;
pub use unit_of_work::{Persistence, TransactionContext, UnitOfWork};
