//! Daily goal and day-log persistence

use super::Repository;
use crate::database::models::*;
use crate::error::{AppError, Result};
use crate::streaks::{self, DayOutcome};
use chrono::{NaiveDate, Utc};
use sqlx::SqliteExecutor;
use uuid::Uuid;

impl Repository {
    /// Create a daily goal
    pub async fn create_daily_goal(&self, req: &CreateDailyGoalRequest) -> Result<DailyGoal> {
        let id = Uuid::new_v4().to_string();

        let goal = sqlx::query_as::<_, DailyGoal>(
            r#"
            INSERT INTO daily_goals (id, title, description, target_value, unit, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.target_value)
        .bind(&req.unit)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created daily goal: {}", id);
        Ok(goal)
    }

    /// Get a daily goal by ID
    pub async fn get_daily_goal(&self, id: &str) -> Result<DailyGoal> {
        sqlx::query_as::<_, DailyGoal>("SELECT * FROM daily_goals WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::DailyGoalNotFound(id.to_string()))
    }

    /// List daily goals, active ones first
    pub async fn list_daily_goals(&self) -> Result<Vec<DailyGoal>> {
        let goals = sqlx::query_as::<_, DailyGoal>(
            "SELECT * FROM daily_goals ORDER BY is_active DESC, created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(goals)
    }

    /// Pause or resume a daily goal
    pub async fn set_daily_goal_active(&self, id: &str, active: bool) -> Result<DailyGoal> {
        let goal = sqlx::query_as::<_, DailyGoal>(
            "UPDATE daily_goals SET is_active = ? WHERE id = ? RETURNING *",
        )
        .bind(active)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::DailyGoalNotFound(id.to_string()))?;

        tracing::debug!("Daily goal {} active = {}", id, active);
        Ok(goal)
    }

    /// Delete a daily goal and its log
    pub async fn delete_daily_goal(&self, id: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM reminders WHERE kind = 'daily_goal' AND entity_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let rows = sqlx::query("DELETE FROM daily_goals WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::DailyGoalNotFound(id.to_string()));
        }

        tx.commit().await?;

        tracing::debug!("Deleted daily goal: {}", id);
        Ok(())
    }

    /// Record the outcome of one day and recompute the goal's streaks.
    ///
    /// A second log for the same day replaces the first. The streak walk is
    /// anchored at `today`.
    pub async fn log_daily_goal_day(
        &self,
        goal_id: &str,
        log_date: NaiveDate,
        succeeded: bool,
        notes: Option<&str>,
        actual_value: Option<f64>,
        today: NaiveDate,
    ) -> Result<(DailyGoal, DailyGoalLog)> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<String> = sqlx::query_scalar("SELECT id FROM daily_goals WHERE id = ?")
            .bind(goal_id)
            .fetch_optional(&mut *tx)
            .await?;

        if exists.is_none() {
            return Err(AppError::DailyGoalNotFound(goal_id.to_string()));
        }

        let log = sqlx::query_as::<_, DailyGoalLog>(
            r#"
            INSERT INTO daily_goal_logs (id, goal_id, log_date, succeeded, notes, actual_value,
                                         created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (goal_id, log_date) DO UPDATE SET
                succeeded = excluded.succeeded,
                notes = excluded.notes,
                actual_value = excluded.actual_value
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(goal_id)
        .bind(log_date)
        .bind(succeeded)
        .bind(notes)
        .bind(actual_value)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        let outcomes = fetch_outcomes(&mut *tx, goal_id).await?;

        let current = streaks::current_streak(&outcomes, today);
        let longest = streaks::longest_streak(&streaks::success_dates(&outcomes));

        let goal = sqlx::query_as::<_, DailyGoal>(
            r#"
            UPDATE daily_goals SET current_streak = ?, longest_streak = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(i64::from(current))
        .bind(i64::from(longest))
        .bind(goal_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(
            "Logged {} for daily goal {} (succeeded = {}), streak {} / best {}",
            log_date,
            goal_id,
            succeeded,
            current,
            longest
        );
        Ok((goal, log))
    }

    /// Day log of a goal, oldest first
    pub async fn list_daily_goal_logs(&self, goal_id: &str) -> Result<Vec<DailyGoalLog>> {
        let logs = sqlx::query_as::<_, DailyGoalLog>(
            "SELECT * FROM daily_goal_logs WHERE goal_id = ? ORDER BY log_date ASC",
        )
        .bind(goal_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }

    /// Logged outcomes of a goal, oldest first
    pub async fn daily_goal_outcomes(&self, goal_id: &str) -> Result<Vec<DayOutcome>> {
        fetch_outcomes(&self.pool, goal_id).await
    }

    /// Whether any outcome was recorded for `day`
    pub async fn daily_goal_logged_on(&self, goal_id: &str, day: NaiveDate) -> Result<bool> {
        let logged: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM daily_goal_logs WHERE goal_id = ? AND log_date = ?)",
        )
        .bind(goal_id)
        .bind(day)
        .fetch_one(&self.pool)
        .await?;

        Ok(logged)
    }
}

async fn fetch_outcomes<'e, E>(executor: E, goal_id: &str) -> Result<Vec<DayOutcome>>
where
    E: SqliteExecutor<'e>,
{
    let outcomes: Vec<DayOutcome> = sqlx::query_as::<_, (NaiveDate, bool)>(
        "SELECT log_date, succeeded FROM daily_goal_logs WHERE goal_id = ? ORDER BY log_date ASC",
    )
    .bind(goal_id)
    .fetch_all(executor)
    .await?
    .into_iter()
    .map(|(date, succeeded)| DayOutcome { date, succeeded })
    .collect();

    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::create_test_repo;
    use crate::database::models::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, d).unwrap()
    }

    async fn create_goal(repo: &crate::database::Repository) -> DailyGoal {
        repo.create_daily_goal(&CreateDailyGoalRequest {
            title: "Drink water".to_string(),
            description: String::new(),
            target_value: Some(2.0),
            unit: Some("litres".to_string()),
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_logging_recomputes_streaks() {
        let repo = create_test_repo().await;
        let goal = create_goal(&repo).await;
        let today = day(10);

        for d in [5, 6, 7] {
            repo.log_daily_goal_day(&goal.id, day(d), true, None, None, today)
                .await
                .unwrap();
        }
        repo.log_daily_goal_day(&goal.id, day(8), true, None, None, today)
            .await
            .unwrap();
        let (goal_after, _) = repo
            .log_daily_goal_day(&goal.id, day(9), true, None, Some(2.5), today)
            .await
            .unwrap();

        assert_eq!(goal_after.current_streak, 5);
        assert_eq!(goal_after.longest_streak, 5);

        let (goal_after, log) = repo
            .log_daily_goal_day(&goal.id, day(10), false, Some("busy"), None, today)
            .await
            .unwrap();

        assert!(!log.succeeded);
        assert_eq!(goal_after.current_streak, 0);
        assert_eq!(goal_after.longest_streak, 5);

        let outcomes = repo.daily_goal_outcomes(&goal.id).await.unwrap();
        assert_eq!(outcomes.len(), 6);
        assert_eq!(outcomes[0].date, day(5));
        assert!(!outcomes[5].succeeded);

        assert!(repo.daily_goal_logged_on(&goal.id, day(10)).await.unwrap());
        assert!(!repo.daily_goal_logged_on(&goal.id, day(11)).await.unwrap());
    }

    #[tokio::test]
    async fn test_relogging_a_day_replaces_it() {
        let repo = create_test_repo().await;
        let goal = create_goal(&repo).await;
        let today = day(3);

        repo.log_daily_goal_day(&goal.id, day(3), false, None, None, today)
            .await
            .unwrap();
        let (goal_after, _) = repo
            .log_daily_goal_day(&goal.id, day(3), true, None, None, today)
            .await
            .unwrap();

        assert_eq!(goal_after.current_streak, 1);
        assert_eq!(repo.list_daily_goal_logs(&goal.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_paused_goals_list_last() {
        let repo = create_test_repo().await;
        let paused = create_goal(&repo).await;
        let running = create_goal(&repo).await;

        let updated = repo.set_daily_goal_active(&paused.id, false).await.unwrap();
        assert!(!updated.is_active);

        let goals = repo.list_daily_goals().await.unwrap();
        assert_eq!(goals[0].id, running.id);
        assert_eq!(goals[1].id, paused.id);

        assert!(repo.set_daily_goal_active("missing", true).await.is_err());
    }

    #[tokio::test]
    async fn test_logging_unknown_goal_fails() {
        let repo = create_test_repo().await;

        let result = repo
            .log_daily_goal_day("missing", day(1), true, None, None, day(1))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_delete_daily_goal_removes_logs() {
        let repo = create_test_repo().await;
        let goal = create_goal(&repo).await;
        repo.log_daily_goal_day(&goal.id, day(1), true, None, None, day(1))
            .await
            .unwrap();

        repo.delete_daily_goal(&goal.id).await.unwrap();

        assert!(repo.get_daily_goal(&goal.id).await.is_err());
        assert!(repo.list_daily_goal_logs(&goal.id).await.unwrap().is_empty());
        assert!(repo.list_daily_goals().await.unwrap().is_empty());
    }
}
