//! Serve command - Starts the HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, RateLimiter};
use crate::jobs::{ApalisMailQueue, LoggingMailQueue, MailQueue};

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    let db = Arc::new(Database::connect(&config).await?);
    tracing::info!("Database connected");

    let rate_limiter = match config.redis_url.as_deref() {
        Some(url) => {
            let limiter = RateLimiter::connect(url)
                .await
                .map_err(|e| AppError::internal(format!("Failed to connect to Redis: {}", e)))?;
            tracing::info!("Redis rate limiter connected");
            Some(Arc::new(limiter))
        }
        None => {
            tracing::warn!("REDIS_URL not set, rate limiting disabled");
            None
        }
    };

    let mail_queue = mail_queue(&config).await?;

    let host = args.host.unwrap_or_else(|| config.server_host.clone());
    let port = args.port.unwrap_or(config.server_port);
    let addr = format!("{}:{}", host, port);

    let app_state = AppState::from_config(db, rate_limiter, mail_queue, config);
    let app = create_router(app_state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    // Connect info feeds the rate limiter's client fallback
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}

/// Email jobs go to Postgres when the main store is Postgres; otherwise
/// they are only logged.
async fn mail_queue(config: &Config) -> AppResult<Arc<dyn MailQueue>> {
    if config.database_url.starts_with("postgres") {
        let queue = ApalisMailQueue::connect(&config.database_url).await?;
        tracing::info!("Email job queue ready");
        Ok(Arc::new(queue))
    } else {
        tracing::warn!("Database is not Postgres, email jobs will be logged and dropped");
        Ok(Arc::new(LoggingMailQueue))
    }
}
