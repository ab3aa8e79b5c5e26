//! Email background job.
//!
//! Jobs are delivered through SMTP when `SMTP_HOST` is set. Otherwise the
//! worker logs each message instead of sending it.

use apalis::prelude::Data;
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use serde::{Deserialize, Serialize};

use crate::config::SmtpConfig;
use crate::errors::AppError;

/// Why a message is being sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailKind {
    /// Admin broadcast to every account
    Marketing,
    /// Message addressed to a single account
    Transactional,
}

/// Email job payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailJob {
    /// Recipient email address
    pub to: String,
    pub subject: String,
    /// Plain text body
    pub body: String,
    pub kind: EmailKind,
}

impl EmailJob {
    pub fn new(
        to: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
        kind: EmailKind,
    ) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            kind,
        }
    }
}

/// SMTP sender shared by the worker. `transport` is `None` when SMTP is
/// not configured.
#[derive(Clone)]
pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: String,
}

impl Mailer {
    pub fn from_config(config: &SmtpConfig) -> Result<Self, AppError> {
        let transport = match config.host.as_deref() {
            Some(host) => {
                let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                    .map_err(|e| AppError::internal(format!("Invalid SMTP relay {}: {}", host, e)))?
                    .port(config.port);

                if let (Some(user), Some(pass)) = (config.user.as_ref(), config.password()) {
                    builder = builder.credentials(Credentials::new(user.clone(), pass.to_string()));
                }

                Some(builder.build())
            }
            None => None,
        };

        Ok(Self {
            transport,
            from: config.from.clone(),
        })
    }

    /// A mailer that only logs.
    pub fn log_only(from: impl Into<String>) -> Self {
        Self {
            transport: None,
            from: from.into(),
        }
    }

    pub async fn deliver(&self, job: &EmailJob) -> Result<(), AppError> {
        let Some(transport) = &self.transport else {
            tracing::warn!("SMTP not configured - logging email instead of sending");
            tracing::info!(
                "=== EMAIL (not sent) ===\n\
                 From: {}\n\
                 To: {}\n\
                 Subject: {}\n\
                 Body:\n{}\n\
                 ========================",
                self.from,
                job.to,
                job.subject,
                job.body
            );
            return Ok(());
        };

        let message = build_message(&self.from, job)?;
        transport
            .send(message)
            .await
            .map_err(|e| AppError::internal(format!("SMTP delivery failed: {}", e)))?;
        Ok(())
    }
}

fn build_message(from: &str, job: &EmailJob) -> Result<Message, AppError> {
    let from = from
        .parse()
        .map_err(|e| AppError::internal(format!("Invalid sender address {}: {}", from, e)))?;
    let to = job
        .to
        .parse()
        .map_err(|e| AppError::internal(format!("Invalid recipient {}: {}", job.to, e)))?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(job.subject.clone())
        .header(ContentType::TEXT_PLAIN)
        .body(job.body.clone())
        .map_err(|e| AppError::internal(format!("Failed to build message: {}", e)))
}

/// Email job handler - processes email sending jobs
pub async fn email_job_handler(job: EmailJob, mailer: Data<Mailer>) -> Result<(), AppError> {
    tracing::info!(
        to = %job.to,
        subject = %job.subject,
        kind = ?job.kind,
        "Processing email job"
    );

    mailer.deliver(&job).await?;

    tracing::info!(to = %job.to, "Email processed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_serializes_kind_in_snake_case() {
        let job = EmailJob::new("a@b.io", "Hi", "Body", EmailKind::Marketing);
        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["kind"], "marketing");
    }

    #[test]
    fn test_build_message_rejects_bad_recipient() {
        let job = EmailJob::new("not an address", "Hi", "Body", EmailKind::Transactional);
        assert!(build_message("noreply@example.com", &job).is_err());
    }

    #[tokio::test]
    async fn test_log_only_mailer_succeeds() {
        let mailer = Mailer::log_only("noreply@example.com");
        let job = EmailJob::new("a@b.io", "Hi", "Body", EmailKind::Transactional);
        assert!(mailer.deliver(&job).await.is_ok());
    }
}
