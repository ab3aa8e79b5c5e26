//! Admin notifications - broadcast and single-recipient email.
//!
//! Recipients are read inside a transaction; jobs are pushed to the mail
//! queue after it commits.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::validation::require;
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::jobs::{EmailJob, EmailKind, MailQueue};
use crate::with_transaction;

#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Queue one email per registered account. Returns the number queued.
    ///
    /// Not idempotent: when the queue fails part way, the error carries how
    /// many were already queued, and a retry sends those recipients again.
    async fn broadcast(&self, acting_user: String, subject: String, body: String)
        -> AppResult<usize>;

    /// Queue an email to a single account
    async fn notify_user(
        &self,
        acting_user: String,
        recipient: String,
        subject: String,
        body: String,
    ) -> AppResult<()>;
}

pub struct Notifier<U: UnitOfWork> {
    uow: Arc<U>,
    queue: Arc<dyn MailQueue>,
}

impl<U: UnitOfWork> Notifier<U> {
    pub fn new(uow: Arc<U>, queue: Arc<dyn MailQueue>) -> Self {
        Self { uow, queue }
    }
}

#[async_trait]
impl<U: UnitOfWork> NotificationService for Notifier<U> {
    async fn broadcast(
        &self,
        acting_user: String,
        subject: String,
        body: String,
    ) -> AppResult<usize> {
        let subject = require("Subject", &subject)?;
        let body = require("Body", &body)?;

        let recipients = with_transaction!(self.uow, |ctx| {
            let users = ctx.users();
            match users.find_by_user_id(&acting_user).await? {
                Some(actor) if actor.is_admin() => {}
                _ => return Err(AppError::Forbidden),
            }
            users.list().await
        })?;

        let total = recipients.len();
        for (queued, user) in recipients.iter().enumerate() {
            let job = EmailJob::new(
                user.email.clone(),
                subject.clone(),
                body.clone(),
                EmailKind::Marketing,
            );
            if let Err(e) = self.queue.enqueue(job).await {
                tracing::error!(queued, total, error = %e, "Broadcast interrupted");
                return Err(AppError::queue(format!(
                    "Broadcast stopped after queueing {} of {} emails: {}",
                    queued, total, e
                )));
            }
        }

        tracing::info!(recipients = recipients.len(), subject = %subject, "Broadcast queued");
        Ok(recipients.len())
    }

    async fn notify_user(
        &self,
        acting_user: String,
        recipient: String,
        subject: String,
        body: String,
    ) -> AppResult<()> {
        let subject = require("Subject", &subject)?;
        let body = require("Body", &body)?;

        let user = with_transaction!(self.uow, |ctx| {
            let users = ctx.users();
            match users.find_by_user_id(&acting_user).await? {
                Some(actor) if actor.is_admin() => {}
                _ => return Err(AppError::Forbidden),
            }
            users
                .find_by_user_id(&recipient)
                .await?
                .ok_or(AppError::UserNotFound)
        })?;

        self.queue
            .enqueue(EmailJob::new(
                user.email,
                subject,
                body,
                EmailKind::Transactional,
            ))
            .await?;

        tracing::info!(user_id = %user.user_id, "Notification queued");
        Ok(())
    }
}
