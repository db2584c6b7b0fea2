//! Reminder persistence

use super::Repository;
use crate::database::models::*;
use crate::error::{AppError, Result};
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

impl Repository {
    /// Create a reminder not bound to any entity
    pub async fn create_reminder(&self, title: &str, body: &str, remind_at: &str) -> Result<Reminder> {
        let id = Uuid::new_v4().to_string();

        let reminder = sqlx::query_as::<_, Reminder>(
            r#"
            INSERT INTO reminders (id, kind, entity_id, title, body, remind_at, enabled, created_at)
            VALUES (?, ?, NULL, ?, ?, ?, 1, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(ReminderKind::Custom)
        .bind(title)
        .bind(body)
        .bind(remind_at)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created reminder: {} at {}", id, remind_at);
        Ok(reminder)
    }

    /// Create or replace the reminder bound to an entity.
    ///
    /// Moving the time clears `last_fired_on` so a reminder moved later in
    /// the day can still fire today.
    pub async fn upsert_entity_reminder(
        &self,
        kind: ReminderKind,
        entity_id: &str,
        title: &str,
        body: &str,
        remind_at: &str,
    ) -> Result<Reminder> {
        let reminder = sqlx::query_as::<_, Reminder>(
            r#"
            INSERT INTO reminders (id, kind, entity_id, title, body, remind_at, enabled, created_at)
            VALUES (?, ?, ?, ?, ?, ?, 1, ?)
            ON CONFLICT (kind, entity_id) DO UPDATE SET
                title = excluded.title,
                body = excluded.body,
                enabled = 1,
                last_fired_on = CASE
                    WHEN reminders.remind_at = excluded.remind_at THEN reminders.last_fired_on
                    ELSE NULL
                END,
                remind_at = excluded.remind_at
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(kind)
        .bind(entity_id)
        .bind(title)
        .bind(body)
        .bind(remind_at)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Registered {:?} reminder for {} at {}", kind, entity_id, remind_at);
        Ok(reminder)
    }

    /// Remove the reminder bound to an entity, if any
    pub async fn delete_entity_reminder(&self, kind: ReminderKind, entity_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM reminders WHERE kind = ? AND entity_id = ?")
            .bind(kind)
            .bind(entity_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Get a reminder by ID
    pub async fn get_reminder(&self, id: &str) -> Result<Reminder> {
        sqlx::query_as::<_, Reminder>("SELECT * FROM reminders WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::ReminderNotFound(id.to_string()))
    }

    /// List all reminders ordered by time of day
    pub async fn list_reminders(&self) -> Result<Vec<Reminder>> {
        let reminders = sqlx::query_as::<_, Reminder>(
            "SELECT * FROM reminders ORDER BY remind_at ASC, created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(reminders)
    }

    /// List enabled reminders that have not fired on `day`
    pub async fn list_pending_reminders(&self, day: NaiveDate) -> Result<Vec<Reminder>> {
        let reminders = sqlx::query_as::<_, Reminder>(
            r#"
            SELECT * FROM reminders
            WHERE enabled = 1 AND (last_fired_on IS NULL OR last_fired_on < ?)
            ORDER BY remind_at ASC
            "#,
        )
        .bind(day)
        .fetch_all(&self.pool)
        .await?;

        Ok(reminders)
    }

    /// Enable or disable a reminder
    pub async fn set_reminder_enabled(&self, id: &str, enabled: bool) -> Result<Reminder> {
        sqlx::query_as::<_, Reminder>("UPDATE reminders SET enabled = ? WHERE id = ? RETURNING *")
            .bind(enabled)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::ReminderNotFound(id.to_string()))
    }

    /// Delete a reminder
    pub async fn delete_reminder(&self, id: &str) -> Result<()> {
        let rows = sqlx::query("DELETE FROM reminders WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::ReminderNotFound(id.to_string()));
        }

        tracing::debug!("Deleted reminder: {}", id);
        Ok(())
    }

    /// Mark a reminder as delivered for `day`
    pub async fn mark_reminder_fired(&self, id: &str, day: NaiveDate) -> Result<()> {
        sqlx::query("UPDATE reminders SET last_fired_on = ? WHERE id = ?")
            .bind(day)
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Marked reminder {} as fired on {}", id, day);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::create_test_repo;
    use crate::database::models::*;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_reminders() {
        let repo = create_test_repo().await;
        let day = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();

        let reminder = repo.create_reminder("Stretch", "", "09:30").await.unwrap();
        assert_eq!(reminder.kind, ReminderKind::Custom);
        assert!(reminder.enabled);

        let pending = repo.list_pending_reminders(day).await.unwrap();
        assert_eq!(pending.len(), 1);

        repo.mark_reminder_fired(&reminder.id, day).await.unwrap();

        assert!(repo.list_pending_reminders(day).await.unwrap().is_empty());
        assert_eq!(
            repo.list_pending_reminders(day.succ_opt().unwrap())
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_entity_reminder_upsert() {
        let repo = create_test_repo().await;
        let day = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();

        let first = repo
            .upsert_entity_reminder(ReminderKind::Habit, "h1", "Read", "", "08:00")
            .await
            .unwrap();
        repo.mark_reminder_fired(&first.id, day).await.unwrap();

        let same_time = repo
            .upsert_entity_reminder(ReminderKind::Habit, "h1", "Read more", "", "08:00")
            .await
            .unwrap();
        assert_eq!(same_time.id, first.id);
        assert_eq!(same_time.title, "Read more");
        assert_eq!(same_time.last_fired_on, Some(day));

        let moved = repo
            .upsert_entity_reminder(ReminderKind::Habit, "h1", "Read more", "", "21:00")
            .await
            .unwrap();
        assert_eq!(moved.remind_at, "21:00");
        assert_eq!(moved.last_fired_on, None);
        assert_eq!(repo.list_reminders().await.unwrap().len(), 1);

        repo.delete_entity_reminder(ReminderKind::Habit, "h1").await.unwrap();
        assert!(repo.list_reminders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_disabled_reminders_are_not_pending() {
        let repo = create_test_repo().await;
        let day = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();

        let reminder = repo.create_reminder("Water", "", "10:00").await.unwrap();
        let disabled = repo.set_reminder_enabled(&reminder.id, false).await.unwrap();
        assert!(!disabled.enabled);

        assert!(repo.list_pending_reminders(day).await.unwrap().is_empty());

        repo.delete_reminder(&reminder.id).await.unwrap();
        assert!(repo.get_reminder(&reminder.id).await.is_err());
    }
}
