//! Habits service
//!
//! High-level business logic for habits: validation, daily check-ins,
//! streak statistics and reminder registration.

use crate::database::{
    CreateHabitRequest, Habit, HabitCompletion, HabitWithStatus, ReminderKind, Repository,
    UpdateHabitRequest,
};
use crate::error::{AppError, Result};
use crate::streaks::{self, DayOutcome};
use crate::validation;
use chrono::{Local, NaiveDate};
use serde::Serialize;

/// Streak and completion figures for one habit
#[derive(Debug, Clone, Serialize)]
pub struct HabitStats {
    pub habit_id: String,
    pub completed_today: bool,
    /// Counter maintained by check-ins
    pub streak: i64,
    /// Consecutive completed days ending today, derived from the log
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_completions: usize,
}

/// Service for managing habits
#[derive(Clone)]
pub struct HabitsService {
    repo: Repository,
}

impl HabitsService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    /// Create a new habit
    pub async fn add_habit(&self, req: CreateHabitRequest) -> Result<Habit> {
        let title = validation::require_title("title", &req.title)?;
        validation::check_description("description", &req.description)?;

        let color = req
            .color
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .map(validation::normalize_color)
            .transpose()?;

        let preferred_time = req
            .preferred_time
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .map(|t| validation::normalize_time_of_day("preferred_time", t))
            .transpose()?;

        let req = CreateHabitRequest {
            title,
            description: req.description.trim().to_string(),
            category: validation::normalize_category(req.category.as_deref())?,
            color,
            preferred_time,
        };

        tracing::info!("Creating new habit: {}", req.title);

        let habit = self.repo.create_habit(&req).await?;

        tracing::info!("Habit created successfully: {}", habit.id);

        Ok(habit)
    }

    /// Get a habit with today's status
    pub async fn get_habit(&self, id: &str) -> Result<HabitWithStatus> {
        let habit = self.repo.get_habit(id).await?;
        let completed_today = self.repo.is_completed_on(id, Self::today()).await?;

        Ok(HabitWithStatus {
            habit,
            completed_today,
        })
    }

    /// List habits with today's status
    pub async fn list_habits(&self, include_archived: bool) -> Result<Vec<HabitWithStatus>> {
        let habits = self.repo.list_habits(include_archived).await?;
        let completed = self.repo.completed_habit_ids_on(Self::today()).await?;

        Ok(habits
            .into_iter()
            .map(|habit| {
                let completed_today = completed.contains(&habit.id);
                HabitWithStatus {
                    habit,
                    completed_today,
                }
            })
            .collect())
    }

    /// Update a habit's descriptive fields
    pub async fn update_habit(&self, id: &str, req: UpdateHabitRequest) -> Result<Habit> {
        tracing::debug!("Updating habit: {}", id);

        let title = req
            .title
            .as_deref()
            .map(|t| validation::require_title("title", t))
            .transpose()?;

        if let Some(description) = &req.description {
            validation::check_description("description", description)?;
        }

        let color = req
            .color
            .as_deref()
            .map(validation::normalize_color)
            .transpose()?;

        let preferred_time = match req.preferred_time.as_deref().map(str::trim) {
            Some("") => Some(String::new()),
            Some(t) => Some(validation::normalize_time_of_day("preferred_time", t)?),
            None => None,
        };

        let category = match req.category.as_deref() {
            Some(c) => Some(
                validation::normalize_category(Some(c))?
                    .ok_or_else(|| AppError::Validation("category: cannot be empty".to_string()))?,
            ),
            None => None,
        };

        let req = UpdateHabitRequest {
            title,
            description: req.description.map(|d| d.trim().to_string()),
            category,
            color,
            preferred_time,
        };

        let habit = self.repo.update_habit(id, &req).await?;

        if habit.reminder_enabled {
            if let Some(time) = &habit.reminder_time {
                self.repo
                    .upsert_entity_reminder(
                        ReminderKind::Habit,
                        &habit.id,
                        &habit.title,
                        &reminder_body(&habit),
                        time,
                    )
                    .await?;
            }
        }

        Ok(habit)
    }

    /// Check a habit in or out for today.
    ///
    /// `is_currently_completed` is the caller's view of today's state: true
    /// removes today's completion, false adds one. Applying it twice in a row
    /// restores the original state.
    pub async fn toggle_habit(
        &self,
        id: &str,
        is_currently_completed: bool,
    ) -> Result<HabitWithStatus> {
        let (habit, completed_today) = self
            .repo
            .toggle_completion(id, Self::today(), is_currently_completed)
            .await?;

        tracing::info!(
            "Habit {} {} for today (streak {})",
            id,
            if completed_today { "completed" } else { "not completed" },
            habit.streak
        );

        Ok(HabitWithStatus {
            habit,
            completed_today,
        })
    }

    /// Hide a habit without deleting its history
    pub async fn archive_habit(&self, id: &str) -> Result<Habit> {
        tracing::info!("Archiving habit: {}", id);
        self.repo.set_habit_archived(id, true).await
    }

    /// Bring an archived habit back
    pub async fn restore_habit(&self, id: &str) -> Result<Habit> {
        tracing::info!("Restoring habit: {}", id);
        self.repo.set_habit_archived(id, false).await
    }

    /// Delete a habit permanently
    pub async fn delete_habit(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting habit: {}", id);

        self.repo.delete_habit(id).await?;

        tracing::info!("Habit deleted successfully: {}", id);

        Ok(())
    }

    /// Store reminder settings and register the reminder with the scheduler.
    ///
    /// Enabling requires a time. Disabling keeps the last time on the habit
    /// unless a new one is given, and removes the scheduled reminder.
    pub async fn update_reminder(
        &self,
        id: &str,
        enabled: bool,
        time: Option<String>,
    ) -> Result<Habit> {
        let time = time
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .map(|t| validation::normalize_time_of_day("reminder_time", t))
            .transpose()?;

        if enabled && time.is_none() {
            return Err(AppError::Validation(
                "reminder_time: is required when enabling a reminder".to_string(),
            ));
        }

        let current = self.repo.get_habit(id).await?;
        let time = time.or(current.reminder_time);

        let habit = self
            .repo
            .set_habit_reminder(id, enabled, time.as_deref())
            .await?;

        match (enabled, habit.reminder_time.as_deref()) {
            (true, Some(at)) => {
                self.repo
                    .upsert_entity_reminder(
                        ReminderKind::Habit,
                        &habit.id,
                        &habit.title,
                        &reminder_body(&habit),
                        at,
                    )
                    .await?;
                tracing::info!("Reminder for habit {} set at {}", id, at);
            }
            _ => {
                self.repo
                    .delete_entity_reminder(ReminderKind::Habit, &habit.id)
                    .await?;
                tracing::info!("Reminder for habit {} disabled", id);
            }
        }

        Ok(habit)
    }

    /// Completion history, newest first
    pub async fn completion_history(&self, id: &str) -> Result<Vec<HabitCompletion>> {
        self.repo.get_habit(id).await?;
        self.repo.list_completions(id).await
    }

    /// Streak statistics derived from the completion log
    pub async fn habit_stats(&self, id: &str) -> Result<HabitStats> {
        let habit = self.repo.get_habit(id).await?;
        let completions = self.repo.list_completions(id).await?;
        let today = Self::today();

        let log: Vec<DayOutcome> = completions
            .iter()
            .map(|c| DayOutcome::success(c.completed_on))
            .collect();

        Ok(HabitStats {
            habit_id: habit.id,
            completed_today: completions.iter().any(|c| c.completed_on == today),
            streak: habit.streak,
            current_streak: streaks::current_streak(&log, today),
            longest_streak: streaks::longest_streak(&streaks::success_dates(&log)),
            total_completions: completions.len(),
        })
    }
}

fn reminder_body(habit: &Habit) -> String {
    if habit.description.is_empty() {
        format!("Time for {}", habit.title)
    } else {
        habit.description.clone()
    }
}
