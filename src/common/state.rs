// Application state shared across all modules

use reqwest::Client;
use sqlx::SqlitePool;

use crate::common::config::AppConfig;
use crate::sequence::SequenceAllocator;

/// Application state containing database pool, sequence allocator and configuration
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub sequences: SequenceAllocator,
    pub http: Client,
    pub config: AppConfig,
}
