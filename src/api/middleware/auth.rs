//! JWT authentication middleware.
//!
//! Customer routes accept tokens signed with the customer secret, admin
//! routes only tokens signed with the admin secret. In both cases the
//! subject is resolved to a live account before the handler runs.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::{User, UserRole};
use crate::errors::AppError;
use crate::services::SessionKind;

/// Authenticated user resolved from the bearer token
#[derive(Clone, Debug)]
pub struct CurrentUser {
    /// Internal sequence key
    pub id: i32,
    /// External identifier
    pub user_id: String,
    pub email: String,
    pub role: UserRole,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            user_id: user.user_id,
            email: user.email,
            role: user.role,
        }
    }
}

fn bearer_token(request: &Request) -> Result<&str, AppError> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .ok_or(AppError::Unauthorized)
}

async fn resolve(state: &AppState, user_id: String) -> Result<CurrentUser, AppError> {
    match state.user_service.resolve_by_external_id(user_id).await {
        Ok(user) => Ok(CurrentUser::from(user)),
        Err(AppError::UserNotFound) => Err(AppError::Unauthorized),
        Err(e) => Err(e),
    }
}

/// Customer session middleware.
///
/// Validates the token, resolves its subject and injects the CurrentUser
/// into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = state
        .auth_service
        .verify_token(bearer_token(&request)?, SessionKind::Customer)?;

    let current_user = resolve(&state, claims.sub).await?;
    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}

/// Admin session middleware.
///
/// A valid customer token is answered with Forbidden rather than
/// Unauthorized.
pub async fn admin_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request)?;
    let claims = match state.auth_service.verify_token(token, SessionKind::Admin) {
        Ok(claims) => claims,
        Err(e) => {
            if state
                .auth_service
                .verify_token(token, SessionKind::Customer)
                .is_ok()
            {
                return Err(AppError::Forbidden);
            }
            return Err(e);
        }
    };

    let current_user = resolve(&state, claims.sub).await?;
    require_admin(&current_user)?;
    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}

/// Require admin role, returns Forbidden error if not admin.
pub fn require_admin(user: &CurrentUser) -> Result<(), AppError> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn current(role: UserRole) -> CurrentUser {
        CurrentUser {
            id: 1,
            user_id: "usr-1".to_string(),
            email: "a@b.io".to_string(),
            role,
        }
    }

    #[test]
    fn test_require_admin() {
        assert!(require_admin(&current(UserRole::Admin)).is_ok());
        assert!(matches!(
            require_admin(&current(UserRole::User)),
            Err(AppError::Forbidden)
        ));
    }
}
