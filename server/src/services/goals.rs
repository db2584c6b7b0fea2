//! Goals service
//!
//! Weekly and monthly goals, their progress, and the reward points they
//! feed into the user profile.

use crate::config::{DEFAULT_CATEGORY, MAX_REWARD_POINTS, WEEKLY_GOAL_DAYS};
use crate::database::{
    CreateGoalRequest, Goal, GoalProgress, GoalType, NewGoal, Profile, Repository,
};
use crate::error::{AppError, Result};
use crate::validation;
use chrono::{DateTime, Duration, Months, Utc};
use serde::Serialize;

/// Goals split for display
#[derive(Debug, Clone, Default, Serialize)]
pub struct GoalPartition {
    pub active: Vec<Goal>,
    pub completed: Vec<Goal>,
    pub expired: Vec<Goal>,
}

/// End of a goal period starting at `start`
pub fn goal_end_date(goal_type: GoalType, start: DateTime<Utc>) -> Result<DateTime<Utc>> {
    match goal_type {
        GoalType::Weekly => Ok(start + Duration::days(WEEKLY_GOAL_DAYS)),
        GoalType::Monthly => start
            .checked_add_months(Months::new(1))
            .ok_or_else(|| AppError::Validation("start_date: out of range".to_string())),
    }
}

/// Split goals into active, completed and expired as of `now`.
///
/// Completed wins over expiry: a goal finished before its deadline stays
/// completed after the deadline passes.
pub fn partition_goals(goals: Vec<Goal>, now: DateTime<Utc>) -> GoalPartition {
    let mut partition = GoalPartition::default();

    for goal in goals {
        if goal.is_completed {
            partition.completed.push(goal);
        } else if goal.end_date > now {
            partition.active.push(goal);
        } else {
            partition.expired.push(goal);
        }
    }

    partition
}

/// Service for managing goals and the profile they reward
#[derive(Clone)]
pub struct GoalsService {
    repo: Repository,
}

impl GoalsService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Create a goal; the period end is fixed here from its type
    pub async fn add_goal(&self, req: CreateGoalRequest) -> Result<Goal> {
        let title = validation::require_title("title", &req.title)?;
        validation::check_description("description", &req.description)?;

        if req.target_count < 1 {
            return Err(AppError::Validation(
                "target_count: must be at least 1".to_string(),
            ));
        }
        if !(0..=MAX_REWARD_POINTS).contains(&req.reward_points) {
            return Err(AppError::Validation(format!(
                "reward_points: must be between 0 and {}",
                MAX_REWARD_POINTS
            )));
        }

        let start_date = req.start_date.unwrap_or_else(Utc::now);
        let end_date = goal_end_date(req.goal_type, start_date)?;

        let goal = NewGoal {
            title,
            description: req.description.trim().to_string(),
            goal_type: req.goal_type,
            target_count: req.target_count,
            reward_points: req.reward_points,
            category: validation::normalize_category(req.category.as_deref())?
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            start_date,
            end_date,
        };

        tracing::info!(
            "Creating {:?} goal '{}' (target {}, ends {})",
            goal.goal_type,
            goal.title,
            goal.target_count,
            goal.end_date
        );

        self.repo.create_goal(&goal).await
    }

    pub async fn get_goal(&self, id: &str) -> Result<Goal> {
        self.repo.get_goal(id).await
    }

    pub async fn list_goals(&self) -> Result<Vec<Goal>> {
        self.repo.list_goals().await
    }

    /// All goals split as of now
    pub async fn partitioned_goals(&self) -> Result<GoalPartition> {
        let goals = self.repo.list_goals().await?;
        Ok(partition_goals(goals, Utc::now()))
    }

    /// Add `increment` to a goal, completing it and awarding points on the
    /// transition
    pub async fn update_goal_progress(&self, id: &str, increment: i64) -> Result<GoalProgress> {
        tracing::debug!("Updating goal {} by {}", id, increment);
        self.repo.apply_goal_progress(id, increment).await
    }

    pub async fn delete_goal(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting goal: {}", id);
        self.repo.delete_goal(id).await
    }

    pub async fn get_profile(&self) -> Result<Profile> {
        self.repo.get_profile().await
    }

    pub async fn update_display_name(&self, display_name: &str) -> Result<Profile> {
        let display_name = validation::require_title("display_name", display_name)?;
        self.repo.update_display_name(&display_name).await
    }
}
