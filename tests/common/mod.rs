//! Shared fixtures for integration tests.
//!
//! Every test gets its own in-memory SQLite database with migrations
//! applied, the real services on top, and a mail queue that records jobs.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sea_orm::ConnectOptions;

use merch_api::api::AppState;
use merch_api::config::Config;
use merch_api::domain::{NewProduct, Product, RegisterUser, User};
use merch_api::errors::AppResult;
use merch_api::infra::Database;
use merch_api::jobs::{EmailJob, MailQueue};
use merch_api::services::{ServiceContainer, Services};

pub const ADMIN_EMAIL: &str = "admin@merch.test";
pub const PASSWORD: &str = "SecurePass123!";

const JWT_SECRET: &str = "test-secret-key-for-testing-only-32chars";
const ADMIN_JWT_SECRET: &str = "test-admin-secret-for-testing-only-32chars";

/// Records every enqueued job instead of sending it.
#[derive(Default)]
pub struct RecordingMailQueue {
    jobs: Mutex<Vec<EmailJob>>,
}

impl RecordingMailQueue {
    pub fn jobs(&self) -> Vec<EmailJob> {
        self.jobs.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailQueue for RecordingMailQueue {
    async fn enqueue(&self, job: EmailJob) -> AppResult<()> {
        self.jobs.lock().unwrap().push(job);
        Ok(())
    }
}

pub struct TestContext {
    pub database: Arc<Database>,
    pub config: Config,
    pub services: Services,
    pub mail: Arc<RecordingMailQueue>,
}

pub fn test_config() -> Config {
    Config::new(
        "sqlite::memory:",
        JWT_SECRET,
        ADMIN_JWT_SECRET,
        Some(ADMIN_EMAIL.to_string()),
    )
}

pub async fn setup() -> TestContext {
    // One connection so every query sees the same in-memory database
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let database = Arc::new(
        Database::connect_with(options)
            .await
            .expect("in-memory database"),
    );
    let config = test_config();
    let mail = Arc::new(RecordingMailQueue::default());
    let services = Services::from_connection(database.get_connection(), config.clone(), mail.clone());

    TestContext {
        database,
        config,
        services,
        mail,
    }
}

impl TestContext {
    pub fn app_state(&self) -> AppState {
        AppState::from_config(
            self.database.clone(),
            None,
            self.mail.clone(),
            self.config.clone(),
        )
    }

    pub async fn register(&self, first_name: &str, email: &str) -> User {
        self.services
            .users()
            .register(RegisterUser {
                first_name: first_name.to_string(),
                last_name: "Tester".to_string(),
                email: email.to_string(),
                phone_number: "+447700900123".to_string(),
                password: PASSWORD.to_string(),
            })
            .await
            .expect("registration")
    }

    pub async fn admin(&self) -> User {
        self.register("Admin", ADMIN_EMAIL).await
    }

    pub async fn add_product(&self, admin: &User, name: &str, price_cents: i64) -> Product {
        self.services
            .catalog()
            .add_product(admin.user_id.clone(), new_product(name, price_cents))
            .await
            .expect("product")
    }
}

pub fn new_product(name: &str, price_cents: i64) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        description: format!("{} description", name),
        image: format!("{}.png", name.to_lowercase()),
        price_cents,
    }
}
