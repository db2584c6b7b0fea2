//! Habit and completion persistence

use super::Repository;
use crate::config::{DEFAULT_CATEGORY, DEFAULT_HABIT_COLOR};
use crate::database::models::*;
use crate::error::{AppError, Result};
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

impl Repository {
    /// Create a new habit
    pub async fn create_habit(&self, req: &CreateHabitRequest) -> Result<Habit> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let habit = sqlx::query_as::<_, Habit>(
            r#"
            INSERT INTO habits (id, title, description, category, color, preferred_time,
                                created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.category.as_deref().unwrap_or(DEFAULT_CATEGORY))
        .bind(req.color.as_deref().unwrap_or(DEFAULT_HABIT_COLOR))
        .bind(&req.preferred_time)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created habit: {}", id);
        Ok(habit)
    }

    /// Get a habit by ID, archived or not
    pub async fn get_habit(&self, id: &str) -> Result<Habit> {
        sqlx::query_as::<_, Habit>("SELECT * FROM habits WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::HabitNotFound(id.to_string()))
    }

    /// List habits, oldest first
    pub async fn list_habits(&self, include_archived: bool) -> Result<Vec<Habit>> {
        let habits = sqlx::query_as::<_, Habit>(
            r#"
            SELECT * FROM habits
            WHERE is_archived = 0 OR ?
            ORDER BY created_at ASC
            "#,
        )
        .bind(include_archived)
        .fetch_all(&self.pool)
        .await?;

        Ok(habits)
    }

    /// Partially update a habit's descriptive fields
    pub async fn update_habit(&self, id: &str, req: &UpdateHabitRequest) -> Result<Habit> {
        let mut query = "UPDATE habits SET updated_at = ?".to_string();
        let mut params: Vec<String> = vec![Utc::now().to_rfc3339()];

        let fields = [
            ("title", &req.title),
            ("description", &req.description),
            ("category", &req.category),
            ("color", &req.color),
            ("preferred_time", &req.preferred_time),
        ];

        for (column, value) in fields {
            if let Some(value) = value {
                if column == "preferred_time" {
                    // An empty time clears it
                    query.push_str(", preferred_time = NULLIF(?, '')");
                } else {
                    query.push_str(&format!(", {} = ?", column));
                }
                params.push(value.clone());
            }
        }

        query.push_str(" WHERE id = ?");
        params.push(id.to_string());

        let mut q = sqlx::query(&query);
        for param in &params {
            q = q.bind(param);
        }

        if q.execute(&self.pool).await?.rows_affected() == 0 {
            return Err(AppError::HabitNotFound(id.to_string()));
        }

        self.get_habit(id).await
    }

    /// Store reminder metadata on the habit
    pub async fn set_habit_reminder(
        &self,
        id: &str,
        enabled: bool,
        reminder_time: Option<&str>,
    ) -> Result<Habit> {
        sqlx::query_as::<_, Habit>(
            r#"
            UPDATE habits SET reminder_enabled = ?, reminder_time = ?, updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(enabled)
        .bind(reminder_time)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::HabitNotFound(id.to_string()))
    }

    /// Soft hide or unhide a habit
    pub async fn set_habit_archived(&self, id: &str, archived: bool) -> Result<Habit> {
        let habit = sqlx::query_as::<_, Habit>(
            r#"
            UPDATE habits SET is_archived = ?, updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(archived)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::HabitNotFound(id.to_string()))?;

        tracing::debug!("Habit {} archived = {}", id, archived);
        Ok(habit)
    }

    /// Permanently delete a habit, its completions and its reminder
    pub async fn delete_habit(&self, id: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM reminders WHERE kind = 'habit' AND entity_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let rows = sqlx::query("DELETE FROM habits WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::HabitNotFound(id.to_string()));
        }

        tx.commit().await?;

        tracing::debug!("Hard deleted habit: {}", id);
        Ok(())
    }

    /// Flip completion for `day` and adjust the streak counter atomically.
    ///
    /// The counter only moves when a completion row was actually inserted or
    /// deleted, so a stale `currently_completed` leaves the habit untouched.
    /// Returns the habit and whether it is completed on `day` afterwards.
    pub async fn toggle_completion(
        &self,
        habit_id: &str,
        day: NaiveDate,
        currently_completed: bool,
    ) -> Result<(Habit, bool)> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let exists: Option<String> = sqlx::query_scalar("SELECT id FROM habits WHERE id = ?")
            .bind(habit_id)
            .fetch_optional(&mut *tx)
            .await?;

        if exists.is_none() {
            return Err(AppError::HabitNotFound(habit_id.to_string()));
        }

        if currently_completed {
            let removed = sqlx::query(
                "DELETE FROM habit_completions WHERE habit_id = ? AND completed_on = ?",
            )
            .bind(habit_id)
            .bind(day)
            .execute(&mut *tx)
            .await?
            .rows_affected();

            if removed > 0 {
                sqlx::query(
                    "UPDATE habits SET streak = MAX(streak - 1, 0), updated_at = ? WHERE id = ?",
                )
                .bind(now)
                .bind(habit_id)
                .execute(&mut *tx)
                .await?;
            }
        } else {
            let inserted = sqlx::query(
                r#"
                INSERT INTO habit_completions (id, habit_id, completed_on, completed_at)
                VALUES (?, ?, ?, ?)
                ON CONFLICT (habit_id, completed_on) DO NOTHING
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(habit_id)
            .bind(day)
            .bind(now)
            .execute(&mut *tx)
            .await?
            .rows_affected();

            if inserted > 0 {
                sqlx::query("UPDATE habits SET streak = streak + 1, updated_at = ? WHERE id = ?")
                    .bind(now)
                    .bind(habit_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        let habit = sqlx::query_as::<_, Habit>("SELECT * FROM habits WHERE id = ?")
            .bind(habit_id)
            .fetch_one(&mut *tx)
            .await?;

        let completed: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM habit_completions WHERE habit_id = ? AND completed_on = ?)",
        )
        .bind(habit_id)
        .bind(day)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(
            "Toggled habit {} on {}: completed = {}, streak = {}",
            habit_id,
            day,
            completed,
            habit.streak
        );
        Ok((habit, completed))
    }

    /// Insert a completion for an arbitrary day without touching the streak
    /// counter
    #[cfg(test)]
    pub(crate) async fn record_completion(
        &self,
        habit_id: &str,
        day: NaiveDate,
        notes: Option<&str>,
    ) -> Result<HabitCompletion> {
        let completion = sqlx::query_as::<_, HabitCompletion>(
            r#"
            INSERT INTO habit_completions (id, habit_id, completed_on, completed_at, notes)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (habit_id, completed_on) DO UPDATE SET notes = excluded.notes
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(habit_id)
        .bind(day)
        .bind(Utc::now())
        .bind(notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(completion)
    }

    /// Whether the habit has a completion on `day`
    pub async fn is_completed_on(&self, habit_id: &str, day: NaiveDate) -> Result<bool> {
        let completed: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM habit_completions WHERE habit_id = ? AND completed_on = ?)",
        )
        .bind(habit_id)
        .bind(day)
        .fetch_one(&self.pool)
        .await?;

        Ok(completed)
    }

    /// IDs of all habits completed on `day`
    pub async fn completed_habit_ids_on(&self, day: NaiveDate) -> Result<Vec<String>> {
        let ids: Vec<String> =
            sqlx::query_scalar("SELECT habit_id FROM habit_completions WHERE completed_on = ?")
                .bind(day)
                .fetch_all(&self.pool)
                .await?;

        Ok(ids)
    }

    /// Completion history, newest first
    pub async fn list_completions(&self, habit_id: &str) -> Result<Vec<HabitCompletion>> {
        let completions = sqlx::query_as::<_, HabitCompletion>(
            r#"
            SELECT * FROM habit_completions
            WHERE habit_id = ?
            ORDER BY completed_on DESC
            "#,
        )
        .bind(habit_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(completions)
    }

    /// Most recent day the habit was completed
    pub async fn last_completion_on(&self, habit_id: &str) -> Result<Option<NaiveDate>> {
        let day: Option<NaiveDate> = sqlx::query_scalar(
            r#"
            SELECT completed_on FROM habit_completions
            WHERE habit_id = ?
            ORDER BY completed_on DESC
            LIMIT 1
            "#,
        )
        .bind(habit_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(day)
    }
}
