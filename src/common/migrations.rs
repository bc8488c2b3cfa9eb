// src/common/migrations.rs
//! Database schema bootstrap

use sqlx::SqlitePool;
use tracing::{info, warn};

/// Create all tables and indexes if they don't exist
///
/// With `reset` set (the `RESET_DB=true` setting) every table is dropped first.
/// That includes `counters`, so sequences restart at 1.
pub async fn run_migrations(pool: &SqlitePool, reset: bool) -> Result<(), sqlx::Error> {
    if reset {
        warn!("⚠️  RESET_DB=true - Dropping all tables and recreating schema...");
        drop_all_tables(pool).await?;
        info!("✅ Dropped old tables");
    }

    create_counter_tables(pool).await?;
    create_user_tables(pool).await?;
    create_mess_tables(pool).await?;
    create_indexes(pool).await?;

    info!("✅ Database migration completed successfully!");

    Ok(())
}

async fn drop_all_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for table in ["messes", "users", "counters"] {
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", table))
            .execute(pool)
            .await?;
    }

    Ok(())
}

async fn create_counter_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // One row per sequence key; mutated only by the allocator's upsert
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS counters (
            key TEXT PRIMARY KEY,
            sequence_value INTEGER NOT NULL DEFAULT 0 CHECK (sequence_value >= 0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_user_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY,
            email TEXT UNIQUE NOT NULL,
            name TEXT,
            avatar TEXT,
            provider TEXT,
            provider_id TEXT,
            created_at TEXT DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_mess_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS messes (
            mess_id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT,
            owner_id INTEGER NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_indexes(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_users_provider ON users(provider, provider_id)",
        "CREATE INDEX IF NOT EXISTS idx_messes_owner_id ON messes(owner_id)",
    ];

    for index in indexes {
        sqlx::query(index).execute(pool).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let pool = memory_pool().await;

        run_migrations(&pool, false).await.unwrap();
        sqlx::query("INSERT INTO counters (key, sequence_value) VALUES ('messId', 7)")
            .execute(&pool)
            .await
            .unwrap();

        run_migrations(&pool, false).await.unwrap();

        let value: i64 =
            sqlx::query_scalar("SELECT sequence_value FROM counters WHERE key = 'messId'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_reset_drops_counters() {
        let pool = memory_pool().await;

        run_migrations(&pool, false).await.unwrap();
        sqlx::query("INSERT INTO counters (key, sequence_value) VALUES ('messId', 7)")
            .execute(&pool)
            .await
            .unwrap();

        run_migrations(&pool, true).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM counters")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_counter_value_cannot_go_negative() {
        let pool = memory_pool().await;
        run_migrations(&pool, false).await.unwrap();

        let result = sqlx::query("INSERT INTO counters (key, sequence_value) VALUES ('bad', -1)")
            .execute(&pool)
            .await;
        assert!(result.is_err());
    }
}
