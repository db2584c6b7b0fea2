//! Missed-day notices
//!
//! Tells the user how many days in a row a habit has gone unchecked.

use crate::config::MISSED_DAY_CUTOFF_HOUR;
use crate::database::{Habit, Repository};
use crate::error::Result;
use crate::services::notifier::{Notification, Notifier};
use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};
use std::sync::Arc;

pub const MISSED_DAY_NOTIFICATION: &str = "missed_day";

/// Days without a completion, counting `today`.
///
/// A habit never completed counts from the day it was created.
pub fn days_missed(last_completion: Option<NaiveDate>, created_on: NaiveDate, today: NaiveDate) -> i64 {
    match last_completion {
        Some(last) => (today - last).num_days().max(0),
        None => ((today - created_on).num_days() + 1).max(0),
    }
}

/// Whether a habit missed for `days` deserves a notice at `hour`.
///
/// Missing only today is not reported before the cutoff hour.
pub fn should_notify(days: i64, hour: u32) -> bool {
    match days {
        d if d <= 0 => false,
        1 => hour >= MISSED_DAY_CUTOFF_HOUR,
        _ => true,
    }
}

pub fn missed_day_message(days: i64, title: &str) -> String {
    let unit = if days == 1 { "day" } else { "days" };
    format!("You've missed {} {} of {}", days, unit, title)
}

/// Sends missed-day notices, at most one per habit per day
#[derive(Clone)]
pub struct AccountabilityService {
    repo: Repository,
    notifier: Arc<dyn Notifier>,
}

impl AccountabilityService {
    pub fn new(repo: Repository, notifier: Arc<dyn Notifier>) -> Self {
        Self { repo, notifier }
    }

    /// Check every active habit as of local time `now`. Returns how many
    /// notices were sent.
    pub async fn check_missed_days(&self, now: NaiveDateTime) -> Result<usize> {
        let today = now.date();
        let habits = self.repo.list_habits(false).await?;
        let mut sent = 0;

        for habit in habits {
            if self.notify_if_missed(&habit, now).await? {
                sent += 1;
            }
        }

        tracing::debug!("Missed-day check for {} sent {} notice(s)", today, sent);
        Ok(sent)
    }

    async fn notify_if_missed(&self, habit: &Habit, now: NaiveDateTime) -> Result<bool> {
        let today = now.date();
        let created_on = habit.created_at.with_timezone(&Local).date_naive();
        let last = self.repo.last_completion_on(&habit.id).await?;

        let days = days_missed(last, created_on, today);
        if !should_notify(days, now.hour()) {
            return Ok(false);
        }

        if self
            .repo
            .notification_sent(MISSED_DAY_NOTIFICATION, &habit.id, today)
            .await?
        {
            return Ok(false);
        }

        let notification = Notification {
            kind: MISSED_DAY_NOTIFICATION.to_string(),
            entity_id: Some(habit.id.clone()),
            title: habit.title.clone(),
            body: missed_day_message(days, &habit.title),
        };

        // Only a delivered notice is recorded, so a failed one is retried on
        // the next run.
        if let Err(e) = self.notifier.notify(&notification).await {
            tracing::error!("Failed to send missed-day notice for {}: {}", habit.id, e);
            return Ok(false);
        }

        self.repo
            .record_notification(MISSED_DAY_NOTIFICATION, &habit.id, today)
            .await?;

        tracing::info!("Missed-day notice sent for habit {} ({} days)", habit.id, days);
        Ok(true)
    }
}
