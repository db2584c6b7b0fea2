//! Services module
//!
//! Business logic services that coordinate between the HTTP routes, the
//! scheduler and the repository.

pub mod accountability;
pub mod daily_goals;
pub mod goals;
pub mod habits;
pub mod journal;
pub mod notifier;
pub mod reminders;
pub mod scheduler;
pub mod settings;

pub use accountability::AccountabilityService;
pub use daily_goals::DailyGoalsService;
pub use goals::{GoalPartition, GoalsService};
pub use habits::{HabitStats, HabitsService};
pub use journal::JournalService;
pub use notifier::{LoggingNotifier, NoOpNotifier, Notification, Notifier, WebhookNotifier};
pub use reminders::RemindersService;
pub use scheduler::{CheckFrequency, SchedulerService};
pub use settings::{AppSettings, SettingsService};
