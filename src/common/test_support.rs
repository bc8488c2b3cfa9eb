// Shared fixtures for tests that need a full AppState

use reqwest::Client;
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use std::time::Duration;

use super::config::{AppConfig, DevModeConfig};
use super::migrations::run_migrations;
use super::state::AppState;
use crate::sequence::{SequenceAllocator, SqliteCounterStore};

pub const TEST_JWT_SECRET: &str = "test_secret_key";

pub fn test_config(dev_mode: bool) -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        port: 0,
        jwt_secret: TEST_JWT_SECRET.to_string(),
        google_client_id: None,
        cors_origins: Vec::new(),
        db_max_connections: 1,
        db_acquire_timeout: Duration::from_secs(5),
        reset_db: false,
        dev_mode: DevModeConfig {
            enabled: dev_mode,
            user_email: "dev@test.com".to_string(),
            user_name: "Dev User".to_string(),
        },
    }
}

/// In-memory database with the schema applied, wired to a SQLite counter store
pub async fn test_state(dev_mode: bool) -> AppState {
    let db = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    run_migrations(&db, false).await.unwrap();

    AppState {
        sequences: SequenceAllocator::new(Arc::new(SqliteCounterStore::new(db.clone()))),
        db,
        http: Client::new(),
        config: test_config(dev_mode),
    }
}
