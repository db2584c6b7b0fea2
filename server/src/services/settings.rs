//! Settings service
//!
//! Manages application settings persistence using JSON file storage.

use crate::config::{
    MAX_FONT_SIZE, MAX_LINE_HEIGHT, MIN_FONT_SIZE, MIN_LINE_HEIGHT, VALID_FONT_FAMILIES,
};
use crate::error::{AppError, Result};
use crate::validation;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

const SETTINGS_FILE: &str = "settings.json";

/// Color scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

/// Switch between light and dark at fixed local times
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeSchedule {
    /// `HH:MM`
    pub light_from: String,
    /// `HH:MM`
    pub dark_from: String,
}

/// Theme configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeSettings {
    #[serde(default)]
    pub mode: ThemeMode,
    #[serde(default)]
    pub schedule: Option<ThemeSchedule>,
}

impl ThemeSettings {
    /// Mode in effect at local `time`. A schedule overrides `mode`.
    pub fn effective_mode(&self, time: NaiveTime) -> ThemeMode {
        let Some(schedule) = &self.schedule else {
            return self.mode;
        };

        let (Ok(light), Ok(dark)) = (
            validation::parse_time_of_day("light_from", &schedule.light_from),
            validation::parse_time_of_day("dark_from", &schedule.dark_from),
        ) else {
            return self.mode;
        };

        let is_light = if light <= dark {
            time >= light && time < dark
        } else {
            // Light period wraps past midnight
            time >= light || time < dark
        };

        if is_light {
            ThemeMode::Light
        } else {
            ThemeMode::Dark
        }
    }
}

/// Text rendering preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypographySettings {
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    #[serde(default = "default_line_height")]
    pub line_height: f32,
}

fn default_font_family() -> String {
    "system".to_string()
}

fn default_font_size() -> u32 {
    16
}

fn default_line_height() -> f32 {
    1.5
}

impl Default for TypographySettings {
    fn default() -> Self {
        Self {
            font_family: default_font_family(),
            font_size: default_font_size(),
            line_height: default_line_height(),
        }
    }
}

/// Switches for the background notification jobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationSettings {
    #[serde(default = "default_true")]
    pub reminders_enabled: bool,
    #[serde(default = "default_true")]
    pub missed_day_alerts: bool,
}

fn default_true() -> bool {
    true
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            reminders_enabled: true,
            missed_day_alerts: true,
        }
    }
}

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub theme: ThemeSettings,
    #[serde(default)]
    pub typography: TypographySettings,
    #[serde(default)]
    pub sidebar_pinned: bool,
    #[serde(default)]
    pub developer_mode: bool,
    #[serde(default)]
    pub journal_locked: bool,
    #[serde(default)]
    pub notifications: NotificationSettings,
}

impl AppSettings {
    pub fn validate(&self) -> Result<()> {
        let typography = &self.typography;

        if !VALID_FONT_FAMILIES.contains(&typography.font_family.as_str()) {
            return Err(AppError::Validation(format!(
                "font_family: must be one of {}",
                VALID_FONT_FAMILIES.join(", ")
            )));
        }
        if !(MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&typography.font_size) {
            return Err(AppError::Validation(format!(
                "font_size: must be between {} and {}",
                MIN_FONT_SIZE, MAX_FONT_SIZE
            )));
        }
        if !(MIN_LINE_HEIGHT..=MAX_LINE_HEIGHT).contains(&typography.line_height) {
            return Err(AppError::Validation(format!(
                "line_height: must be between {} and {}",
                MIN_LINE_HEIGHT, MAX_LINE_HEIGHT
            )));
        }

        if let Some(schedule) = &self.theme.schedule {
            let light = validation::parse_time_of_day("light_from", &schedule.light_from)?;
            let dark = validation::parse_time_of_day("dark_from", &schedule.dark_from)?;
            if light == dark {
                return Err(AppError::Validation(
                    "theme schedule: light_from and dark_from must differ".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Service for managing application settings
#[derive(Clone)]
pub struct SettingsService {
    settings_path: PathBuf,
}

impl SettingsService {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            settings_path: data_dir.join(SETTINGS_FILE),
        }
    }

    /// Load settings from disk or create default if not exists
    pub async fn load(&self) -> Result<AppSettings> {
        if !fs::try_exists(&self.settings_path).await? {
            tracing::info!("Settings file not found, creating default settings");
            let default = AppSettings::default();
            self.save(&default).await?;
            return Ok(default);
        }

        let content = fs::read_to_string(&self.settings_path).await?;
        let settings: AppSettings = serde_json::from_str(&content)?;

        Ok(settings)
    }

    /// Save settings to disk
    pub async fn save(&self, settings: &AppSettings) -> Result<()> {
        let content = serde_json::to_string_pretty(settings)?;

        fs::write(&self.settings_path, content).await?;
        tracing::info!("Settings saved to {:?}", self.settings_path);

        Ok(())
    }

    /// Validate and replace all settings
    pub async fn update(&self, settings: AppSettings) -> Result<AppSettings> {
        settings.validate()?;
        self.save(&settings).await?;
        Ok(settings)
    }

    pub async fn notifications(&self) -> Result<NotificationSettings> {
        Ok(self.load().await?.notifications)
    }
}
