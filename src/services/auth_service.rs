//! Authentication service - Issues and verifies session tokens.
//!
//! Customer and admin sessions are signed with different secrets and carry
//! different lifetimes. A token is only accepted by the verifier for the
//! session kind it was issued as.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use super::UserService;
use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{User, UserRole};
use crate::errors::{AppError, AppResult};

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// External user identifier
    pub sub: String,
    pub role: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

/// Which signing key a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Customer,
    Admin,
}

impl From<UserRole> for SessionKind {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Admin => SessionKind::Admin,
            UserRole::User => SessionKind::Customer,
        }
    }
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[serde(rename = "jwToken")]
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    #[schema(example = 7200)]
    pub expires_in: i64,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Check credentials and issue a session token
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Verify a token issued for `kind` and extract its claims
    fn verify_token(&self, token: &str, kind: SessionKind) -> AppResult<Claims>;
}

/// Concrete implementation of AuthService backed by the user directory.
pub struct Authenticator {
    users: Arc<dyn UserService>,
    config: Config,
}

impl Authenticator {
    pub fn new(users: Arc<dyn UserService>, config: Config) -> Self {
        Self { users, config }
    }

    fn signing_secret(&self, kind: SessionKind) -> &[u8] {
        match kind {
            SessionKind::Customer => self.config.jwt_secret_bytes(),
            SessionKind::Admin => self.config.admin_jwt_secret_bytes(),
        }
    }

    fn lifetime_hours(&self, kind: SessionKind) -> i64 {
        match kind {
            SessionKind::Customer => self.config.jwt_expiration_hours,
            SessionKind::Admin => self.config.admin_jwt_expiration_hours,
        }
    }

    /// Sign a token for `user` with the key matching its role.
    pub fn issue_token(&self, user: &User) -> AppResult<TokenResponse> {
        let kind = SessionKind::from(user.role);
        let hours = self.lifetime_hours(kind);
        let now = Utc::now();
        let expires_at = now + Duration::hours(hours);

        let claims = Claims {
            sub: user.user_id.clone(),
            role: user.role.to_string(),
            iss: self.config.jwt_issuer.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.signing_secret(kind)),
        )?;

        Ok(TokenResponse {
            access_token: token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: hours * SECONDS_PER_HOUR,
        })
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let user = self.users.authenticate(email, password).await?;
        tracing::info!(user_id = %user.user_id, role = %user.role, "User logged in");
        self.issue_token(&user)
    }

    fn verify_token(&self, token: &str, kind: SessionKind) -> AppResult<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[self.config.jwt_issuer.as_str()]);

        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.signing_secret(kind)),
            &validation,
        )?
        .claims;

        let role_matches = match kind {
            SessionKind::Admin => UserRole::from(claims.role.as_str()).is_admin(),
            SessionKind::Customer => !UserRole::from(claims.role.as_str()).is_admin(),
        };
        if !role_matches {
            return Err(AppError::Unauthorized);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MockUserService;

    fn config() -> Config {
        Config::new(
            "sqlite::memory:",
            "customer-secret-for-tests-32-chars!",
            "admin-secret-for-tests-32-characters",
            Some("boss@shop.io".to_string()),
        )
    }

    fn user(role: UserRole) -> User {
        let now = Utc::now();
        User {
            id: 1,
            user_id: "usr-test-1".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@shop.io".to_string(),
            phone: "5551234".to_string(),
            password_hash: String::new(),
            role,
            created_at: now,
            updated_at: now,
        }
    }

    fn authenticator_returning(role: UserRole) -> Authenticator {
        let mut users = MockUserService::new();
        users
            .expect_authenticate()
            .returning(move |_, _| Ok(user(role)));
        Authenticator::new(Arc::new(users), config())
    }

    #[tokio::test]
    async fn test_customer_token_round_trip() {
        let auth = authenticator_returning(UserRole::User);
        let token = auth
            .login("ada@shop.io".to_string(), "Password123".to_string())
            .await
            .unwrap();

        assert_eq!(token.expires_in, 2 * SECONDS_PER_HOUR);
        let claims = auth
            .verify_token(&token.access_token, SessionKind::Customer)
            .unwrap();
        assert_eq!(claims.sub, "usr-test-1");
        assert_eq!(claims.role, "user");
        assert_eq!(claims.iss, "merch-api");
    }

    #[tokio::test]
    async fn test_admin_token_uses_admin_key() {
        let auth = authenticator_returning(UserRole::Admin);
        let token = auth
            .login("boss@shop.io".to_string(), "Password123".to_string())
            .await
            .unwrap();

        assert_eq!(token.expires_in, 10 * SECONDS_PER_HOUR);
        assert!(auth
            .verify_token(&token.access_token, SessionKind::Admin)
            .is_ok());
        assert!(auth
            .verify_token(&token.access_token, SessionKind::Customer)
            .is_err());
    }

    #[tokio::test]
    async fn test_customer_token_rejected_on_admin_routes() {
        let auth = authenticator_returning(UserRole::User);
        let token = auth
            .login("ada@shop.io".to_string(), "Password123".to_string())
            .await
            .unwrap();

        assert!(auth
            .verify_token(&token.access_token, SessionKind::Admin)
            .is_err());
    }

    #[tokio::test]
    async fn test_login_propagates_invalid_credentials() {
        let mut users = MockUserService::new();
        users
            .expect_authenticate()
            .returning(|_, _| Err(AppError::InvalidCredentials));
        let auth = Authenticator::new(Arc::new(users), config());

        let result = auth
            .login("nobody@shop.io".to_string(), "Password123".to_string())
            .await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let auth = authenticator_returning(UserRole::User);
        assert!(auth
            .verify_token("not.a.token", SessionKind::Customer)
            .is_err());
    }
}
