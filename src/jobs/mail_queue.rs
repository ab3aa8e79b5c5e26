//! Enqueueing side of the email job queue.

use apalis::prelude::Storage;
use apalis_sql::postgres::PostgresStorage;
use async_trait::async_trait;

use super::EmailJob;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Destination for outgoing email jobs.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait MailQueue: Send + Sync {
    async fn enqueue(&self, job: EmailJob) -> AppResult<()>;
}

/// Queue persisted in Postgres and drained by `jobs work`.
#[derive(Clone)]
pub struct ApalisMailQueue {
    storage: PostgresStorage<EmailJob>,
}

impl ApalisMailQueue {
    pub fn new(storage: PostgresStorage<EmailJob>) -> Self {
        Self { storage }
    }

    /// Connect to `database_url` and make sure the queue tables exist.
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        use apalis_sql::sqlx::postgres::PgPoolOptions;

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(|e| AppError::queue(format!("Failed to connect job storage: {}", e)))?;

        PostgresStorage::setup(&pool)
            .await
            .map_err(|e| AppError::queue(format!("Failed to setup job storage: {}", e)))?;

        Ok(Self::new(PostgresStorage::new(pool)))
    }

    /// Storage handle for the worker side of the queue
    pub fn storage(&self) -> PostgresStorage<EmailJob> {
        self.storage.clone()
    }
}

#[async_trait]
impl MailQueue for ApalisMailQueue {
    async fn enqueue(&self, job: EmailJob) -> AppResult<()> {
        let mut storage = self.storage.clone();
        storage
            .push(job)
            .await
            .map_err(|e| AppError::queue(format!("Failed to enqueue email: {}", e)))?;
        Ok(())
    }
}

/// Queue that discards jobs after logging them. Used when the server runs
/// without a Postgres job store.
#[derive(Debug, Default, Clone)]
pub struct LoggingMailQueue;

#[async_trait]
impl MailQueue for LoggingMailQueue {
    async fn enqueue(&self, job: EmailJob) -> AppResult<()> {
        tracing::warn!(to = %job.to, subject = %job.subject, "No job queue configured, email dropped");
        Ok(())
    }
}
