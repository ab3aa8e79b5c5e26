//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Database, RateLimiter};
use crate::jobs::MailQueue;
use crate::services::{
    AddressService, AuthService, CartService, CatalogService, NotificationService,
    ServiceContainer, Services, UserService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub catalog_service: Arc<dyn CatalogService>,
    pub cart_service: Arc<dyn CartService>,
    pub address_service: Arc<dyn AddressService>,
    pub notification_service: Arc<dyn NotificationService>,
    /// Redis rate limiter; `None` disables rate limiting
    pub rate_limiter: Option<Arc<RateLimiter>>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Wire every service over the shared database connection.
    pub fn from_config(
        database: Arc<Database>,
        rate_limiter: Option<Arc<RateLimiter>>,
        mail_queue: Arc<dyn MailQueue>,
        config: Config,
    ) -> Self {
        let container = Services::from_connection(database.get_connection(), config, mail_queue);

        Self {
            auth_service: container.auth(),
            user_service: container.users(),
            catalog_service: container.catalog(),
            cart_service: container.carts(),
            address_service: container.addresses(),
            notification_service: container.notifications(),
            rate_limiter,
            database,
        }
    }
}
