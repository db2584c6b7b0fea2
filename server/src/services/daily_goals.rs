//! Daily goals service

use crate::database::{CreateDailyGoalRequest, DailyGoal, DailyGoalLog, ReminderKind, Repository};
use crate::error::{AppError, Result};
use crate::streaks;
use crate::validation;
use chrono::{Local, NaiveDate};
use serde::Deserialize;

/// One day's outcome as sent by a client
#[derive(Debug, Clone, Deserialize)]
pub struct LogDayRequest {
    /// Defaults to today
    #[serde(default)]
    pub log_date: Option<NaiveDate>,
    pub succeeded: bool,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub actual_value: Option<f64>,
}

/// Service for daily goals and their day log
#[derive(Clone)]
pub struct DailyGoalsService {
    repo: Repository,
}

impl DailyGoalsService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    pub async fn create_daily_goal(&self, req: CreateDailyGoalRequest) -> Result<DailyGoal> {
        let title = validation::require_title("title", &req.title)?;
        validation::check_description("description", &req.description)?;

        if let Some(target) = req.target_value {
            if !target.is_finite() || target <= 0.0 {
                return Err(AppError::Validation(
                    "target_value: must be a positive number".to_string(),
                ));
            }
        }

        let req = CreateDailyGoalRequest {
            title,
            description: req.description.trim().to_string(),
            target_value: req.target_value,
            unit: req
                .unit
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty()),
        };

        tracing::info!("Creating daily goal: {}", req.title);
        self.repo.create_daily_goal(&req).await
    }

    pub async fn get_daily_goal(&self, id: &str) -> Result<DailyGoal> {
        let goal = self.repo.get_daily_goal(id).await?;
        self.with_current_streak(goal, Local::now().date_naive()).await
    }

    pub async fn list_daily_goals(&self) -> Result<Vec<DailyGoal>> {
        let today = Local::now().date_naive();
        let mut goals = Vec::new();

        for goal in self.repo.list_daily_goals().await? {
            goals.push(self.with_current_streak(goal, today).await?);
        }

        Ok(goals)
    }

    /// The stored streak is as of the last log. Days that passed unlogged
    /// since then break the run, so walk the log again from `today`.
    async fn with_current_streak(&self, mut goal: DailyGoal, today: NaiveDate) -> Result<DailyGoal> {
        let outcomes = self.repo.daily_goal_outcomes(&goal.id).await?;
        goal.current_streak = i64::from(streaks::current_streak(&outcomes, today));
        Ok(goal)
    }

    /// Paused goals keep their log but get no reminders
    pub async fn set_active(&self, id: &str, active: bool) -> Result<DailyGoal> {
        tracing::info!("Setting daily goal {} active = {}", id, active);
        let goal = self.repo.set_daily_goal_active(id, active).await?;
        self.with_current_streak(goal, Local::now().date_naive()).await
    }

    pub async fn delete_daily_goal(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting daily goal: {}", id);
        self.repo.delete_daily_goal(id).await
    }

    /// Record a day's outcome and refresh the goal's streaks.
    ///
    /// Future days cannot be logged.
    pub async fn log_day(&self, goal_id: &str, req: LogDayRequest) -> Result<(DailyGoal, DailyGoalLog)> {
        let today = Local::now().date_naive();
        let log_date = req.log_date.unwrap_or(today);

        if log_date > today {
            return Err(AppError::Validation(
                "log_date: cannot be in the future".to_string(),
            ));
        }

        let notes = req
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());
        if let Some(notes) = notes {
            validation::check_description("notes", notes)?;
        }

        if matches!(req.actual_value, Some(v) if !v.is_finite()) {
            return Err(AppError::Validation(
                "actual_value: must be a finite number".to_string(),
            ));
        }

        self.repo
            .log_daily_goal_day(goal_id, log_date, req.succeeded, notes, req.actual_value, today)
            .await
    }

    pub async fn list_logs(&self, goal_id: &str) -> Result<Vec<DailyGoalLog>> {
        self.repo.get_daily_goal(goal_id).await?;
        self.repo.list_daily_goal_logs(goal_id).await
    }

    /// Set or clear the daily reminder for a goal
    pub async fn set_reminder(&self, goal_id: &str, time: Option<String>) -> Result<DailyGoal> {
        let goal = self.repo.get_daily_goal(goal_id).await?;

        match time.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            Some(time) => {
                let at = validation::normalize_time_of_day("remind_at", time)?;
                self.repo
                    .upsert_entity_reminder(
                        ReminderKind::DailyGoal,
                        &goal.id,
                        &goal.title,
                        &format!("Log today's result for {}", goal.title),
                        &at,
                    )
                    .await?;
                tracing::info!("Reminder for daily goal {} set at {}", goal_id, at);
            }
            None => {
                self.repo
                    .delete_entity_reminder(ReminderKind::DailyGoal, &goal.id)
                    .await?;
                tracing::info!("Reminder for daily goal {} removed", goal_id);
            }
        }

        self.with_current_streak(goal, Local::now().date_naive()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::repository::test_support::create_test_repo;
    use chrono::Duration;

    fn request(title: &str) -> CreateDailyGoalRequest {
        CreateDailyGoalRequest {
            title: title.to_string(),
            description: String::new(),
            target_value: None,
            unit: None,
        }
    }

    fn outcome(log_date: NaiveDate, succeeded: bool) -> LogDayRequest {
        LogDayRequest {
            log_date: Some(log_date),
            succeeded,
            notes: None,
            actual_value: None,
        }
    }

    #[tokio::test]
    async fn test_create_validation() {
        let service = DailyGoalsService::new(create_test_repo().await);

        assert!(service.create_daily_goal(request("")).await.is_err());

        let mut negative = request("Steps");
        negative.target_value = Some(-5.0);
        assert!(service.create_daily_goal(negative).await.is_err());

        let mut blank_unit = request("Steps");
        blank_unit.unit = Some("  ".to_string());
        let goal = service.create_daily_goal(blank_unit).await.unwrap();
        assert_eq!(goal.unit, None);
        assert_eq!(goal.current_streak, 0);
    }

    #[tokio::test]
    async fn test_log_day_streaks() {
        let service = DailyGoalsService::new(create_test_repo().await);
        let goal = service.create_daily_goal(request("No sugar")).await.unwrap();
        let today = Local::now().date_naive();

        service
            .log_day(&goal.id, outcome(today - Duration::days(3), false))
            .await
            .unwrap();
        for back in [2, 1] {
            service
                .log_day(&goal.id, outcome(today - Duration::days(back), true))
                .await
                .unwrap();
        }

        // Today not logged yet
        let goal_now = service.get_daily_goal(&goal.id).await.unwrap();
        assert_eq!(goal_now.current_streak, 2);
        assert_eq!(goal_now.longest_streak, 2);

        let (goal_now, log) = service
            .log_day(
                &goal.id,
                LogDayRequest {
                    log_date: None,
                    succeeded: false,
                    notes: Some(" party ".to_string()),
                    actual_value: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(log.log_date, today);
        assert_eq!(log.notes.as_deref(), Some("party"));
        assert_eq!(goal_now.current_streak, 0);
        assert_eq!(goal_now.longest_streak, 2);

        assert_eq!(service.list_logs(&goal.id).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_streak_lapses_when_days_go_unlogged() {
        let repo = create_test_repo().await;
        let service = DailyGoalsService::new(repo.clone());
        let goal = service.create_daily_goal(request("Stretch")).await.unwrap();
        let today = Local::now().date_naive();
        let logged_on = today - Duration::days(4);

        // Logged back then, when that day was "today"
        let (stored, _) = repo
            .log_daily_goal_day(&goal.id, logged_on, true, None, None, logged_on)
            .await
            .unwrap();
        assert_eq!(stored.current_streak, 1);

        let goal_now = service.get_daily_goal(&goal.id).await.unwrap();
        assert_eq!(goal_now.current_streak, 0);
        assert_eq!(goal_now.longest_streak, 1);

        let listed = service.list_daily_goals().await.unwrap();
        assert_eq!(listed[0].current_streak, 0);
    }

    #[tokio::test]
    async fn test_future_days_rejected() {
        let service = DailyGoalsService::new(create_test_repo().await);
        let goal = service.create_daily_goal(request("Read")).await.unwrap();
        let tomorrow = Local::now().date_naive() + Duration::days(1);

        let result = service.log_day(&goal.id, outcome(tomorrow, true)).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_reminder_set_and_cleared() {
        let repo = create_test_repo().await;
        let service = DailyGoalsService::new(repo.clone());
        let goal = service.create_daily_goal(request("Journal")).await.unwrap();

        assert!(service
            .set_reminder(&goal.id, Some("9pm".to_string()))
            .await
            .is_err());

        service
            .set_reminder(&goal.id, Some("21:00".to_string()))
            .await
            .unwrap();
        let reminders = repo.list_reminders().await.unwrap();
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].kind, ReminderKind::DailyGoal);

        service.set_reminder(&goal.id, None).await.unwrap();
        assert!(repo.list_reminders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_goal() {
        let service = DailyGoalsService::new(create_test_repo().await);

        assert!(matches!(
            service.list_logs("nope").await,
            Err(AppError::DailyGoalNotFound(_))
        ));
    }
}
