//! Goal persistence and reward accounting

use super::{Repository, PROFILE_ID};
use crate::database::models::*;
use crate::error::{AppError, Result};
use chrono::Utc;
use uuid::Uuid;

impl Repository {
    /// Create a goal with no progress
    pub async fn create_goal(&self, goal: &NewGoal) -> Result<Goal> {
        let id = Uuid::new_v4().to_string();

        let created = sqlx::query_as::<_, Goal>(
            r#"
            INSERT INTO goals (id, title, description, goal_type, target_count, current_count,
                               start_date, end_date, is_completed, reward_points, category,
                               created_at)
            VALUES (?, ?, ?, ?, ?, 0, ?, ?, 0, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&goal.title)
        .bind(&goal.description)
        .bind(goal.goal_type)
        .bind(goal.target_count)
        .bind(goal.start_date)
        .bind(goal.end_date)
        .bind(goal.reward_points)
        .bind(&goal.category)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created goal: {}", id);
        Ok(created)
    }

    /// Get a goal by ID
    pub async fn get_goal(&self, id: &str) -> Result<Goal> {
        sqlx::query_as::<_, Goal>("SELECT * FROM goals WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::GoalNotFound(id.to_string()))
    }

    /// List all goals, soonest deadline first
    pub async fn list_goals(&self) -> Result<Vec<Goal>> {
        let goals = sqlx::query_as::<_, Goal>("SELECT * FROM goals ORDER BY end_date ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(goals)
    }

    /// Delete a goal
    pub async fn delete_goal(&self, id: &str) -> Result<()> {
        let rows = sqlx::query("DELETE FROM goals WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::GoalNotFound(id.to_string()));
        }

        tracing::debug!("Deleted goal: {}", id);
        Ok(())
    }

    /// Add `increment` to a goal's progress in one transaction.
    ///
    /// The count never drops below zero. Reaching the target marks the goal
    /// completed and credits its reward points to the profile; a completed
    /// goal stays completed, so the reward is credited exactly once.
    pub async fn apply_goal_progress(&self, id: &str, increment: i64) -> Result<GoalProgress> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let goal = sqlx::query_as::<_, Goal>("SELECT * FROM goals WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::GoalNotFound(id.to_string()))?;

        let new_count = goal.current_count.saturating_add(increment).max(0);
        let was_completed = goal.is_completed;
        let is_completed = was_completed || new_count >= goal.target_count;
        let newly_completed = is_completed && !was_completed;

        let goal = sqlx::query_as::<_, Goal>(
            r#"
            UPDATE goals
            SET current_count = ?,
                is_completed = ?,
                completed_at = CASE WHEN ? THEN ? ELSE completed_at END
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(new_count)
        .bind(is_completed)
        .bind(newly_completed)
        .bind(now)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        let points_awarded = if newly_completed { goal.reward_points } else { 0 };

        let mut profile = sqlx::query_as::<_, Profile>("SELECT * FROM user_profile WHERE id = ?")
            .bind(PROFILE_ID)
            .fetch_one(&mut *tx)
            .await?;

        if points_awarded > 0 {
            let total_points = profile.total_points.saturating_add(points_awarded);

            profile = sqlx::query_as::<_, Profile>(
                r#"
                UPDATE user_profile SET total_points = ?, level = ?, updated_at = ?
                WHERE id = ?
                RETURNING *
                "#,
            )
            .bind(total_points)
            .bind(Profile::level_for_points(total_points))
            .bind(now)
            .bind(PROFILE_ID)
            .fetch_one(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        if newly_completed {
            tracing::info!(
                "Goal {} completed, awarded {} points (total {})",
                id,
                points_awarded,
                profile.total_points
            );
        }

        Ok(GoalProgress {
            goal,
            newly_completed,
            points_awarded,
            profile,
        })
    }
}
