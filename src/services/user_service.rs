//! User directory - account registration, credential checks and lookup.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{Config, USER_ID_PREFIX};
use crate::domain::validation::{validate_email, validate_name, validate_phone};
use crate::domain::{Password, RegisterUser, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::NewUserRecord;
use crate::infra::UnitOfWork;
use crate::with_transaction;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// Check an email/password pair. Unknown email and wrong password are
    /// indistinguishable to the caller.
    async fn authenticate(&self, email: String, password: String) -> AppResult<User>;

    /// Validate and store a new account
    async fn register(&self, input: RegisterUser) -> AppResult<User>;

    /// Look up an account by its external identifier
    async fn resolve_by_external_id(&self, user_id: String) -> AppResult<User>;

    /// All accounts, oldest first
    async fn list_users(&self) -> AppResult<Vec<User>>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn authenticate(&self, email: String, password: String) -> AppResult<User> {
        let email = normalize_email(&email);
        let found = with_transaction!(self.uow, |ctx| ctx.users().find_by_email(&email).await)?;

        match found {
            Some(user) if Password::from_hash(user.password_hash.clone()).verify(&password) => {
                Ok(user)
            }
            Some(user) => {
                tracing::warn!(user_id = %user.user_id, "Login failed: wrong password");
                Err(AppError::InvalidCredentials)
            }
            None => {
                Password::verify_dummy(&password);
                tracing::warn!("Login failed: unknown email");
                Err(AppError::InvalidCredentials)
            }
        }
    }

    async fn register(&self, input: RegisterUser) -> AppResult<User> {
        let first_name = input.first_name.trim().to_string();
        let last_name = input.last_name.trim().to_string();
        let email = normalize_email(&input.email);
        let phone = input.phone_number.trim().to_string();

        validate_name("First name", &first_name)?;
        validate_name("Last name", &last_name)?;
        validate_email(&email)?;
        validate_phone(&phone)?;
        let password_hash = Password::new(&input.password)?.into_string();

        let role = if self.config.is_admin_email(&email) {
            UserRole::Admin
        } else {
            UserRole::User
        };

        let record = NewUserRecord {
            user_id: format!("{}{}", USER_ID_PREFIX, Uuid::new_v4()),
            first_name,
            last_name,
            email,
            phone,
            password_hash,
            role,
        };

        let user = with_transaction!(self.uow, |ctx| {
            let users = ctx.users();
            if users.find_by_email(&record.email).await?.is_some() {
                return Err(AppError::conflict("Email"));
            }
            users.create(record).await
        })?;

        tracing::info!(user_id = %user.user_id, role = %user.role, "User registered");
        Ok(user)
    }

    async fn resolve_by_external_id(&self, user_id: String) -> AppResult<User> {
        with_transaction!(self.uow, |ctx| ctx.users().find_by_user_id(&user_id).await)?
            .ok_or(AppError::UserNotFound)
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        with_transaction!(self.uow, |ctx| ctx.users().list().await)
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_email;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }
}
