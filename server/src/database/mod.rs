//! Database module
//!
//! This module provides all database functionality including:
//! - Schema and migrations
//! - Model definitions
//! - Repository layer for habits, goals, daily goals, journal and reminders

pub mod models;
pub mod repository;
pub mod schema;

pub use models::*;
pub use repository::Repository;
pub use schema::initialize_database;

use crate::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;

const MAX_CONNECTIONS: u32 = 5;

fn connect_options(db_path: &Path) -> SqliteConnectOptions {
    SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(5))
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
}

/// Open the database file, apply pending migrations and return the pool.
///
/// Migrations run on their own single-connection pool which is closed
/// before the application pool opens, so no pooled connection holds a
/// schema cached from before a migration.
pub async fn create_pool(db_path: &Path) -> Result<SqlitePool> {
    tracing::info!("Opening database at: {:?}", db_path);

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let migration_pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(connect_options(db_path))
        .await?;

    initialize_database(&migration_pool).await?;
    migration_pool.close().await;

    let pool = SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(connect_options(db_path))
        .await?;

    tracing::info!("Database pool ready ({} connections)", MAX_CONNECTIONS);

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_create_pool_creates_file_and_schema() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested").join("habitual.db");

        let pool = create_pool(&db_path).await.unwrap();
        assert!(db_path.exists());

        let foreign_keys: i32 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(foreign_keys, 1);

        let repo = Repository::new(pool);
        assert_eq!(repo.get_profile().await.unwrap().level, 1);
    }

    #[tokio::test]
    async fn test_reopening_keeps_data() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("habitual.db");

        {
            let repo = Repository::new(create_pool(&db_path).await.unwrap());
            repo.update_display_name("Alex").await.unwrap();
        }

        let repo = Repository::new(create_pool(&db_path).await.unwrap());
        assert_eq!(repo.get_profile().await.unwrap().display_name, "Alex");
    }
}
