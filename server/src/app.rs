//! Application state and initialization
//!
//! This module manages the central application state and lifecycle.
//! All services are initialized here and made available through AppState.

use crate::config::ServerConfig;
use crate::database::{create_pool, Repository};
use crate::error::{AppError, Result};
use crate::services::{
    AccountabilityService, CheckFrequency, DailyGoalsService, GoalsService, HabitsService,
    JournalService, LoggingNotifier, Notifier, RemindersService, SchedulerService,
    SettingsService, WebhookNotifier,
};
use std::sync::Arc;

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub habits: HabitsService,
    pub goals: GoalsService,
    pub daily_goals: DailyGoalsService,
    pub journal: JournalService,
    pub reminders: RemindersService,
    pub accountability: AccountabilityService,
    pub settings: SettingsService,
}

impl AppState {
    /// Wire every service around one repository and notifier
    pub fn new(config: ServerConfig, repo: Repository, notifier: Arc<dyn Notifier>) -> Self {
        let settings = SettingsService::new(config.data_dir.clone());

        Self {
            config: Arc::new(config),
            habits: HabitsService::new(repo.clone()),
            goals: GoalsService::new(repo.clone()),
            daily_goals: DailyGoalsService::new(repo.clone()),
            journal: JournalService::new(repo.clone()),
            reminders: RemindersService::new(repo.clone(), Arc::clone(&notifier)),
            accountability: AccountabilityService::new(repo, notifier),
            settings,
        }
    }

    /// Application setup - called once on startup
    pub async fn initialize(config: ServerConfig) -> Result<Self> {
        tracing::info!("Initializing application");
        tracing::info!("Data directory: {:?}", config.data_dir);

        std::fs::create_dir_all(&config.data_dir)?;

        let pool = create_pool(&config.database_path()).await?;
        let repo = Repository::new(pool);

        let notifier: Arc<dyn Notifier> = match &config.webhook_url {
            Some(url) => {
                tracing::info!("Delivering notifications to webhook {}", url);
                Arc::new(WebhookNotifier::new(url.clone())?)
            }
            None => {
                tracing::info!("No webhook configured, notifications go to the log");
                Arc::new(LoggingNotifier)
            }
        };

        let state = Self::new(config, repo, notifier);

        // Write default settings on first run
        state.settings.load().await?;

        tracing::info!("Application initialized successfully");

        Ok(state)
    }

    /// Build and start the background scheduler for reminders and
    /// missed-day notices
    pub async fn start_scheduler(&self) -> Result<SchedulerService> {
        let frequency: CheckFrequency = self
            .config
            .missed_day_frequency
            .parse()
            .map_err(AppError::Validation)?;

        let scheduler = SchedulerService::new(
            self.reminders.clone(),
            self.accountability.clone(),
            self.settings.clone(),
        )
        .await?;

        scheduler.schedule_jobs(frequency).await?;
        scheduler.start().await?;

        if let Some(next) = scheduler.next_missed_day_check().await? {
            tracing::info!("Next missed-day check at {}", next);
        }

        Ok(scheduler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_initialize_creates_data_files() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("data");

        let state = AppState::initialize(ServerConfig::with_data_dir(data_dir.clone()))
            .await
            .unwrap();

        assert!(data_dir.join("habitual.db").exists());
        assert!(data_dir.join("settings.json").exists());
        assert!(state.habits.list_habits(true).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bad_frequency_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = ServerConfig::with_data_dir(temp_dir.path().to_path_buf());
        config.missed_day_frequency = "sometimes".to_string();

        let state = AppState::initialize(config).await.unwrap();
        assert!(state.start_scheduler().await.is_err());
    }
}
