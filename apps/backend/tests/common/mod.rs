//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext wiring the real router to an in-memory or SQLite store
//! - Helpers for seeding questions
//! - User header helpers
//!
//! The PostgreSQL context needs DATABASE_URL and is only used by ignored tests.
#![allow(dead_code)]

pub mod fixtures;

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use axum_test::TestServer;
use uuid::Uuid;

use examprep_backend::config::Config;
use examprep_backend::models::NewQuestion;
use examprep_backend::store::{MasteryStore, MemoryStore, PgStore, SqliteStore};
use examprep_backend::{build_router, AppState};

/// Test context holding the store and the router built on top of it.
pub struct TestContext {
    pub store: Arc<dyn MasteryStore>,
    app: Router,
}

impl TestContext {
    /// Context backed by the in-memory store.
    pub fn new() -> Self {
        Self::from_store(Arc::new(MemoryStore::new()))
    }

    /// Context backed by an in-memory SQLite database.
    pub fn with_sqlite() -> Self {
        let store = SqliteStore::open_in_memory().expect("Failed to open SQLite store");
        Self::from_store(Arc::new(store))
    }

    /// Context backed by PostgreSQL.
    ///
    /// # Panics
    /// Panics if DATABASE_URL is not set or database connection fails.
    pub async fn with_postgres() -> Self {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

        let store = PgStore::connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        store
            .run_migrations()
            .await
            .expect("Failed to run migrations");

        Self::from_store(Arc::new(store))
    }

    fn from_store(store: Arc<dyn MasteryStore>) -> Self {
        let app = build_router(AppState::new(store.clone(), Config::default()));
        Self { store, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(self.router()).unwrap()
    }

    /// Add `count` questions under `subject` and return their ids.
    pub async fn seed_questions(&self, subject: &str, count: usize) -> Vec<i64> {
        let mut ids = Vec::with_capacity(count);
        for i in 0..count {
            let question = self
                .store
                .create_question(&NewQuestion {
                    subject: subject.to_string(),
                    prompt: format!("{subject} question {}", i + 1),
                })
                .await
                .expect("Failed to create test question");
            ids.push(question.id);
        }
        ids
    }

    /// Header name carrying the caller's identity.
    pub fn user_header() -> HeaderName {
        HeaderName::from_static("x-user-id")
    }

    /// Header value for a user id.
    pub fn user_header_value(user_id: Uuid) -> HeaderValue {
        HeaderValue::from_str(&user_id.to_string()).unwrap()
    }
}
