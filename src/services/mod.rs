//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. Every storage access goes through the Unit of
//! Work, one transaction per operation.

mod address_service;
mod auth_service;
mod cart_service;
mod catalog_service;
pub mod container;
mod notification_service;
mod user_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use address_service::{AddressManager, AddressService};
pub use auth_service::{AuthService, Authenticator, Claims, SessionKind, TokenResponse};
pub use cart_service::{CartManager, CartService};
pub use catalog_service::{CatalogManager, CatalogService};
pub use notification_service::{NotificationService, Notifier};
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use user_service::MockUserService;
