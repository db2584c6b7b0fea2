//! Database models
//!
//! Rust structs representing database entities.
//! All models use serde for serialization to API clients.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A habit definition with its streak counter
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Habit {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    /// `#RRGGBB`
    pub color: String,
    /// `HH:MM` local time
    pub preferred_time: Option<String>,
    pub reminder_enabled: bool,
    /// `HH:MM` local time
    pub reminder_time: Option<String>,
    pub streak: i64,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create habit request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateHabitRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub preferred_time: Option<String>,
}

/// Update habit request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateHabitRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub preferred_time: Option<String>,
}

/// One completion event. At most one exists per habit per day.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HabitCompletion {
    pub id: String,
    pub habit_id: String,
    pub completed_on: NaiveDate,
    pub completed_at: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Habit together with its state for the current day
#[derive(Debug, Clone, Serialize)]
pub struct HabitWithStatus {
    #[serde(flatten)]
    pub habit: Habit,
    pub completed_today: bool,
}

/// Goal period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum GoalType {
    Weekly,
    Monthly,
}

/// A weekly or monthly goal
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Goal {
    pub id: String,
    pub title: String,
    pub description: String,
    pub goal_type: GoalType,
    pub target_count: i64,
    pub current_count: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub reward_points: i64,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

/// Create goal request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGoalRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub goal_type: GoalType,
    pub target_count: i64,
    #[serde(default)]
    pub reward_points: i64,
    #[serde(default)]
    pub category: Option<String>,
    /// Defaults to now
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
}

/// Fully resolved goal ready for insertion
#[derive(Debug, Clone)]
pub struct NewGoal {
    pub title: String,
    pub description: String,
    pub goal_type: GoalType,
    pub target_count: i64,
    pub reward_points: i64,
    pub category: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Result of advancing a goal
#[derive(Debug, Clone, Serialize)]
pub struct GoalProgress {
    pub goal: Goal,
    /// True only on the call that crossed the target
    pub newly_completed: bool,
    pub points_awarded: i64,
    pub profile: Profile,
}

/// Singleton user profile
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: String,
    pub display_name: String,
    pub total_points: i64,
    pub level: i64,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Level reached with `total_points`: one level per 1000 points, starting at 1
    pub fn level_for_points(total_points: i64) -> i64 {
        total_points.max(0) / crate::config::POINTS_PER_LEVEL + 1
    }
}

/// A goal tracked as a yes/no outcome per day
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DailyGoal {
    pub id: String,
    pub title: String,
    pub description: String,
    pub target_value: Option<f64>,
    pub unit: Option<String>,
    pub current_streak: i64,
    pub longest_streak: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Create daily goal request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDailyGoalRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub target_value: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
}

/// Outcome of a daily goal on one day
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DailyGoalLog {
    pub id: String,
    pub goal_id: String,
    pub log_date: NaiveDate,
    pub succeeded: bool,
    pub notes: Option<String>,
    pub actual_value: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// A journal entry
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JournalEntry {
    pub id: String,
    pub title: String,
    pub content: String,
    pub mood: Option<String>,
    pub entry_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create journal entry request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateJournalEntryRequest {
    #[serde(default)]
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub entry_date: Option<NaiveDate>,
}

/// Update journal entry request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateJournalEntryRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub entry_date: Option<NaiveDate>,
}

/// What a reminder is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ReminderKind {
    Habit,
    DailyGoal,
    Custom,
}

/// A reminder delivered once per day at a local time of day
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reminder {
    pub id: String,
    pub kind: ReminderKind,
    pub entity_id: Option<String>,
    pub title: String,
    pub body: String,
    /// `HH:MM` local time
    pub remind_at: String,
    pub enabled: bool,
    pub last_fired_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Create custom reminder request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReminderRequest {
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub remind_at: String,
}
