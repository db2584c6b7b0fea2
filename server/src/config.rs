//! Application configuration
//!
//! Central location for configuration constants, validation boundaries,
//! and the environment-driven server configuration.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

// ===== Validation Limits =====

/// Maximum length for habit, goal, reminder and journal titles
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum length for free-form descriptions and notes
pub const MAX_DESCRIPTION_LENGTH: usize = 2_000;

/// Maximum length for a journal entry body (roughly 20 pages of text)
pub const MAX_JOURNAL_CONTENT_LENGTH: usize = 100_000;

/// Default color assigned to habits created without one
pub const DEFAULT_HABIT_COLOR: &str = "#6366f1";

/// Default category for habits and goals
pub const DEFAULT_CATEGORY: &str = "general";

// ===== Streaks & Rewards =====

/// How far back the current-streak walk looks before giving up
pub const STREAK_LOOKBACK_DAYS: u32 = 365;

/// Points needed per profile level
pub const POINTS_PER_LEVEL: i64 = 1_000;

/// Largest reward a single goal may carry
pub const MAX_REWARD_POINTS: i64 = 1_000_000;

/// Length of a weekly goal in days
pub const WEEKLY_GOAL_DAYS: i64 = 7;

// ===== Typography Settings Limits =====

/// Minimum font size in points
pub const MIN_FONT_SIZE: u32 = 10;

/// Maximum font size in points
pub const MAX_FONT_SIZE: u32 = 32;

/// Minimum line height multiplier
pub const MIN_LINE_HEIGHT: f32 = 1.0;

/// Maximum line height multiplier
pub const MAX_LINE_HEIGHT: f32 = 3.0;

/// Font families offered by the client
pub const VALID_FONT_FAMILIES: &[&str] = &["system", "serif", "sans-serif", "monospace", "dyslexic"];

// ===== Notification Scheduling =====

/// Cron expression for the reminder check (every minute, on the minute)
pub const REMINDER_CHECK_CRON: &str = "0 * * * * *";

/// Before this local hour a habit missed only today is not reported
pub const MISSED_DAY_CUTOFF_HOUR: u32 = 12;

/// Local hour of a daily missed-day check. Must be past the cutoff.
pub const MISSED_DAY_DAILY_HOUR: u32 = 18;

/// Default frequency for the missed-day check
pub const DEFAULT_MISSED_DAY_FREQUENCY: &str = "1h";

// ===== Server =====

const DEFAULT_ADDR: &str = "127.0.0.1:8787";
const DEFAULT_DATA_DIR: &str = "./data";
const DATABASE_FILE: &str = "habitual.db";

/// Server configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub addr: SocketAddr,
    /// Directory holding the database and settings file
    pub data_dir: PathBuf,
    /// Optional endpoint receiving notifications as JSON
    pub webhook_url: Option<String>,
    /// Frequency string for the missed-day job (e.g. "30m", "2h", "daily")
    pub missed_day_frequency: String,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `HABITUAL_ADDR` | Server bind address | `127.0.0.1:8787` |
    /// | `HABITUAL_DATA_DIR` | Database and settings directory | `./data` |
    /// | `HABITUAL_WEBHOOK_URL` | Notification webhook | (unset: log only) |
    /// | `HABITUAL_MISSED_DAY_FREQUENCY` | Missed-day check frequency | `1h` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("HABITUAL_ADDR")
            .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let data_dir = env::var("HABITUAL_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));

        let webhook_url = env::var("HABITUAL_WEBHOOK_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        if let Some(url) = &webhook_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::InvalidWebhookUrl(url.clone()));
            }
        }

        let missed_day_frequency = env::var("HABITUAL_MISSED_DAY_FREQUENCY")
            .unwrap_or_else(|_| DEFAULT_MISSED_DAY_FREQUENCY.to_string());

        Ok(Self {
            addr,
            data_dir,
            webhook_url,
            missed_day_frequency,
        })
    }

    /// Configuration rooted at `data_dir` with defaults for everything else
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8787)),
            data_dir,
            webhook_url: None,
            missed_day_frequency: DEFAULT_MISSED_DAY_FREQUENCY.to_string(),
        }
    }

    /// Path of the SQLite database file
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid HABITUAL_ADDR format")]
    InvalidAddr,

    #[error("HABITUAL_WEBHOOK_URL must be an http(s) URL, got {0}")]
    InvalidWebhookUrl(String),
}
