//! Service Container - Centralized service access.
//!
//! Builds every service over one shared `Persistence` so handlers only
//! depend on service traits.

use std::sync::Arc;

use super::{
    AddressManager, AddressService, AuthService, Authenticator, CartManager, CartService,
    CatalogManager, CatalogService, NotificationService, Notifier, UserManager, UserService,
};
use crate::config::Config;
use crate::infra::Persistence;
use crate::jobs::MailQueue;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn catalog(&self) -> Arc<dyn CatalogService>;

    fn carts(&self) -> Arc<dyn CartService>;

    fn addresses(&self) -> Arc<dyn AddressService>;

    fn notifications(&self) -> Arc<dyn NotificationService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    catalog_service: Arc<dyn CatalogService>,
    cart_service: Arc<dyn CartService>,
    address_service: Arc<dyn AddressService>,
    notification_service: Arc<dyn NotificationService>,
}

impl Services {
    /// Create service container from database connection, config and the
    /// queue email jobs are pushed to.
    pub fn from_connection(
        db: sea_orm::DatabaseConnection,
        config: Config,
        mail_queue: Arc<dyn MailQueue>,
    ) -> Self {
        let uow = Arc::new(Persistence::new(db));
        let user_service: Arc<dyn UserService> =
            Arc::new(UserManager::new(uow.clone(), config.clone()));

        Self {
            auth_service: Arc::new(Authenticator::new(user_service.clone(), config)),
            user_service,
            catalog_service: Arc::new(CatalogManager::new(uow.clone())),
            cart_service: Arc::new(CartManager::new(uow.clone())),
            address_service: Arc::new(AddressManager::new(uow.clone())),
            notification_service: Arc::new(Notifier::new(uow, mail_queue)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn catalog(&self) -> Arc<dyn CatalogService> {
        self.catalog_service.clone()
    }

    fn carts(&self) -> Arc<dyn CartService> {
        self.cart_service.clone()
    }

    fn addresses(&self) -> Arc<dyn AddressService> {
        self.address_service.clone()
    }

    fn notifications(&self) -> Arc<dyn NotificationService> {
        self.notification_service.clone()
    }
}
