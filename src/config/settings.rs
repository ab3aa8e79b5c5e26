//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_ADMIN_JWT_EXPIRATION_HOURS, DEFAULT_DATABASE_URL, DEFAULT_JWT_EXPIRATION_HOURS,
    DEFAULT_JWT_ISSUER, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEFAULT_SMTP_FROM,
    DEFAULT_SMTP_PORT, MIN_JWT_SECRET_LENGTH,
};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    /// Redis is optional; rate limiting is disabled without it.
    pub redis_url: Option<String>,
    jwt_secret: String,
    admin_jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_expiration_hours: i64,
    pub admin_jwt_expiration_hours: i64,
    /// Accounts registered with this email receive the admin role.
    pub admin_email: Option<String>,
    pub server_host: String,
    pub server_port: u16,
    pub smtp: SmtpConfig,
}

/// Outgoing mail settings used by the email worker.
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: Option<String>,
    pub port: u16,
    pub user: Option<String>,
    pass: Option<String>,
    pub from: String,
}

impl SmtpConfig {
    /// Read SMTP settings from the environment.
    pub fn from_env() -> Self {
        Self {
            host: env::var("SMTP_HOST").ok().filter(|h| !h.is_empty()),
            port: env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            user: env::var("SMTP_USER").ok(),
            pass: env::var("SMTP_PASS").ok(),
            from: env::var("SMTP_FROM").unwrap_or_else(|_| DEFAULT_SMTP_FROM.to_string()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.host.is_some()
    }

    pub fn password(&self) -> Option<&str> {
        self.pass.as_deref()
    }
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("pass", &"[REDACTED]")
            .field("from", &self.from)
            .finish()
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("redis_url", &self.redis_url.as_ref().map(|_| "[REDACTED]"))
            .field("jwt_secret", &"[REDACTED]")
            .field("admin_jwt_secret", &"[REDACTED]")
            .field("jwt_issuer", &self.jwt_issuer)
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("admin_jwt_expiration_hours", &self.admin_jwt_expiration_hours)
            .field("admin_email", &self.admin_email)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("smtp", &self.smtp)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if a signing secret is missing in a release build or is too
    /// short (security requirement).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = secret_from_env("JWT_SECRET", "dev-user-secret-minimum-32-chars!!");
        let admin_jwt_secret =
            secret_from_env("ADMIN_JWT_SECRET", "dev-admin-secret-minimum-32-chars!");

        if jwt_secret == admin_jwt_secret {
            tracing::warn!("JWT_SECRET and ADMIN_JWT_SECRET are identical; admin tokens lose their separation");
        }

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            redis_url: env::var("REDIS_URL").ok().filter(|u| !u.is_empty()),
            jwt_secret,
            admin_jwt_secret,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| DEFAULT_JWT_ISSUER.to_string()),
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_JWT_EXPIRATION_HOURS),
            admin_jwt_expiration_hours: env::var("ADMIN_JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_ADMIN_JWT_EXPIRATION_HOURS),
            admin_email: env::var("ADMIN_EMAIL")
                .ok()
                .map(|e| e.trim().to_lowercase())
                .filter(|e| !e.is_empty()),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            smtp: SmtpConfig::from_env(),
        }
    }

    /// Build a configuration from explicit values (tests, embedding).
    pub fn new(
        database_url: impl Into<String>,
        jwt_secret: impl Into<String>,
        admin_jwt_secret: impl Into<String>,
        admin_email: Option<String>,
    ) -> Self {
        Self {
            database_url: database_url.into(),
            redis_url: None,
            jwt_secret: jwt_secret.into(),
            admin_jwt_secret: admin_jwt_secret.into(),
            jwt_issuer: DEFAULT_JWT_ISSUER.to_string(),
            jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            admin_jwt_expiration_hours: DEFAULT_ADMIN_JWT_EXPIRATION_HOURS,
            admin_email: admin_email.map(|e| e.trim().to_lowercase()),
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            smtp: SmtpConfig {
                host: None,
                port: DEFAULT_SMTP_PORT,
                user: None,
                pass: None,
                from: DEFAULT_SMTP_FROM.to_string(),
            },
        }
    }

    /// Get customer JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get admin JWT secret bytes for token signing/verification.
    pub fn admin_jwt_secret_bytes(&self) -> &[u8] {
        self.admin_jwt_secret.as_bytes()
    }

    /// Whether `email` is the configured admin account.
    pub fn is_admin_email(&self, email: &str) -> bool {
        self.admin_email
            .as_deref()
            .is_some_and(|admin| admin.eq_ignore_ascii_case(email.trim()))
    }
}

fn secret_from_env(key: &str, dev_default: &str) -> String {
    let secret = env::var(key).unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            tracing::warn!("{} not set, using insecure default for development", key);
            dev_default.to_string()
        } else {
            panic!("{} environment variable must be set in production", key);
        }
    });

    if secret.len() < MIN_JWT_SECRET_LENGTH {
        panic!(
            "{} must be at least {} characters long",
            key, MIN_JWT_SECRET_LENGTH
        );
    }

    secret
}
