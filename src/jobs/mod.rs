//! Background jobs.
//!
//! Email jobs are pushed by the notification service and processed by the
//! `jobs work` worker.

mod email_job;
mod mail_queue;

pub use email_job::{email_job_handler, EmailJob, EmailKind, Mailer};
pub use mail_queue::{ApalisMailQueue, LoggingMailQueue, MailQueue};

#[cfg(any(test, feature = "test-utils"))]
pub use mail_queue::MockMailQueue;
