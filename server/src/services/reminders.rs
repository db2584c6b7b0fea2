//! Reminders service
//!
//! Custom reminders plus delivery of every due reminder. Delivery is
//! driven by the scheduler once a minute; each reminder fires at most once
//! per local calendar day.

use crate::database::{CreateReminderRequest, Reminder, ReminderKind, Repository};
use crate::error::{AppError, Result};
use crate::services::notifier::{Notification, Notifier};
use crate::validation;
use chrono::NaiveDateTime;
use std::sync::Arc;

pub const REMINDER_NOTIFICATION: &str = "reminder";

/// Reminders service
#[derive(Clone)]
pub struct RemindersService {
    repo: Repository,
    notifier: Arc<dyn Notifier>,
}

impl RemindersService {
    pub fn new(repo: Repository, notifier: Arc<dyn Notifier>) -> Self {
        Self { repo, notifier }
    }

    /// Create a custom reminder
    pub async fn create_reminder(&self, req: CreateReminderRequest) -> Result<Reminder> {
        let title = validation::require_title("title", &req.title)?;
        validation::check_description("body", &req.body)?;
        let remind_at = validation::normalize_time_of_day("remind_at", &req.remind_at)?;

        tracing::info!("Creating reminder '{}' at {}", title, remind_at);
        self.repo
            .create_reminder(&title, req.body.trim(), &remind_at)
            .await
    }

    pub async fn get_reminder(&self, id: &str) -> Result<Reminder> {
        self.repo.get_reminder(id).await
    }

    pub async fn list_reminders(&self) -> Result<Vec<Reminder>> {
        self.repo.list_reminders().await
    }

    pub async fn set_enabled(&self, id: &str, enabled: bool) -> Result<Reminder> {
        tracing::info!(
            "{} reminder {}",
            if enabled { "Enabling" } else { "Disabling" },
            id
        );
        self.repo.set_reminder_enabled(id, enabled).await
    }

    pub async fn delete_reminder(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting reminder: {}", id);
        self.repo.delete_reminder(id).await
    }

    /// Deliver every reminder due at or before `now` that has not fired
    /// today. Returns how many notifications were sent.
    ///
    /// A reminder is marked fired before delivery, so a failing transport
    /// never causes the same reminder to repeat within the day.
    pub async fn fire_due(&self, now: NaiveDateTime) -> Result<usize> {
        let today = now.date();
        let pending = self.repo.list_pending_reminders(today).await?;
        let mut sent = 0;

        for reminder in pending {
            let due_at = match validation::parse_time_of_day("remind_at", &reminder.remind_at) {
                Ok(time) => time,
                Err(e) => {
                    tracing::warn!("Skipping reminder {} with bad time: {}", reminder.id, e);
                    continue;
                }
            };

            if due_at > now.time() {
                continue;
            }

            let deliver = self.should_deliver(&reminder, now).await?;
            self.repo.mark_reminder_fired(&reminder.id, today).await?;

            if !deliver {
                tracing::debug!("Reminder {} not needed today", reminder.id);
                continue;
            }

            tracing::info!("Triggering reminder {} ({})", reminder.id, reminder.title);

            let notification = Notification {
                kind: REMINDER_NOTIFICATION.to_string(),
                entity_id: reminder.entity_id.clone(),
                title: reminder.title.clone(),
                body: reminder.body.clone(),
            };

            match self.notifier.notify(&notification).await {
                Ok(()) => sent += 1,
                Err(e) => tracing::error!("Failed to deliver reminder {}: {}", reminder.id, e),
            }
        }

        Ok(sent)
    }

    /// Entity reminders are pointless once the day's work is already done
    async fn should_deliver(&self, reminder: &Reminder, now: NaiveDateTime) -> Result<bool> {
        let Some(entity_id) = reminder.entity_id.as_deref() else {
            return Ok(true);
        };

        match reminder.kind {
            ReminderKind::Custom => Ok(true),
            ReminderKind::Habit => match self.repo.get_habit(entity_id).await {
                Ok(habit) if habit.is_archived => Ok(false),
                Ok(_) => Ok(!self.repo.is_completed_on(entity_id, now.date()).await?),
                Err(AppError::HabitNotFound(_)) => Ok(false),
                Err(e) => Err(e),
            },
            ReminderKind::DailyGoal => match self.repo.get_daily_goal(entity_id).await {
                Ok(goal) if !goal.is_active => Ok(false),
                Ok(_) => Ok(!self.repo.daily_goal_logged_on(entity_id, now.date()).await?),
                Err(AppError::DailyGoalNotFound(_)) => Ok(false),
                Err(e) => Err(e),
            },
        }
    }
}
