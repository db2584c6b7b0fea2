//! Repository layer for database operations
//!
//! CRUD operations for every entity, split by area. Operations that touch
//! more than one row (toggling a habit, advancing a goal, logging a day)
//! run inside a single transaction.

mod daily_goals;
mod goals;
mod habits;
mod journal;
mod reminders;

use super::models::Profile;
use crate::error::Result;
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

/// Id of the singleton profile row seeded by the initial migration
pub const PROFILE_ID: &str = "default";

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the user profile
    pub async fn get_profile(&self) -> Result<Profile> {
        let profile = sqlx::query_as::<_, Profile>("SELECT * FROM user_profile WHERE id = ?")
            .bind(PROFILE_ID)
            .fetch_one(&self.pool)
            .await?;

        Ok(profile)
    }

    /// Rename the user profile
    pub async fn update_display_name(&self, display_name: &str) -> Result<Profile> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            UPDATE user_profile SET display_name = ?, updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(display_name)
        .bind(Utc::now())
        .bind(PROFILE_ID)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Renamed profile to {}", display_name);
        Ok(profile)
    }

    /// Whether a notification of `kind` was already sent for `entity_id` on `day`
    pub async fn notification_sent(&self, kind: &str, entity_id: &str, day: NaiveDate) -> Result<bool> {
        let sent: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM notification_log WHERE kind = ? AND entity_id = ? AND sent_on = ?
            )
            "#,
        )
        .bind(kind)
        .bind(entity_id)
        .bind(day)
        .fetch_one(&self.pool)
        .await?;

        Ok(sent)
    }

    /// Remember that a notification was sent. Returns false if already recorded.
    pub async fn record_notification(&self, kind: &str, entity_id: &str, day: NaiveDate) -> Result<bool> {
        let rows = sqlx::query(
            "INSERT OR IGNORE INTO notification_log (kind, entity_id, sent_on) VALUES (?, ?, ?)",
        )
        .bind(kind)
        .bind(entity_id)
        .bind(day)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows == 1)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Repository;
    use crate::database::schema::initialize_database;
    use sqlx::sqlite::SqlitePoolOptions;

    /// In-memory repository. A single connection keeps every query on the
    /// same in-memory database.
    pub async fn create_test_repo() -> Repository {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        initialize_database(&pool).await.unwrap();

        Repository::new(pool)
    }
}
