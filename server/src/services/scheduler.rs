/// Scheduler Service
/// Runs the reminder and missed-day checks on cron schedules, evaluated in
/// local time. Each run reads the notification switches from settings first.
use crate::config::{MISSED_DAY_DAILY_HOUR, REMINDER_CHECK_CRON};
use crate::error::{AppError, Result};
use crate::services::{AccountabilityService, RemindersService, SettingsService};
use chrono::{DateTime, Local};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_cron_scheduler::{Job, JobScheduler};
use uuid::Uuid;

/// How often the missed-day check runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckFrequency {
    Minutes(u32),
    Hours(u32),
    Days(u32),
}

impl CheckFrequency {
    /// Convert frequency to a six-field cron expression
    pub fn to_cron(self) -> String {
        match self {
            CheckFrequency::Minutes(1) => "0 * * * * *".to_string(),
            CheckFrequency::Minutes(m) => format!("0 */{} * * * *", m),
            CheckFrequency::Hours(1) => "0 0 * * * *".to_string(),
            CheckFrequency::Hours(h) => format!("0 0 */{} * * *", h),
            CheckFrequency::Days(1) => format!("0 0 {} * * *", MISSED_DAY_DAILY_HOUR),
            CheckFrequency::Days(d) => format!("0 0 {} */{} * *", MISSED_DAY_DAILY_HOUR, d),
        }
    }
}

impl fmt::Display for CheckFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckFrequency::Minutes(m) => write!(f, "{}m", m),
            CheckFrequency::Hours(h) => write!(f, "{}h", h),
            CheckFrequency::Days(d) => write!(f, "{}d", d),
        }
    }
}

impl FromStr for CheckFrequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        // Supports "30m", "2h", "1d" as well as "hourly" and "daily"
        let s = s.trim().to_lowercase();

        match s.as_str() {
            "hourly" => return Ok(CheckFrequency::Hours(1)),
            "daily" => return Ok(CheckFrequency::Days(1)),
            _ => {}
        }

        let Some(unit) = s.chars().last() else {
            return Err("Empty frequency string".to_string());
        };
        let number_part = &s[..s.len() - unit.len_utf8()];

        let value: u32 = number_part
            .parse()
            .map_err(|_| format!("Invalid number in frequency: {}", s))?;

        if value == 0 {
            return Err("Frequency value must be greater than 0".to_string());
        }

        match unit {
            'm' if value < 60 => Ok(CheckFrequency::Minutes(value)),
            'h' if value < 24 => Ok(CheckFrequency::Hours(value)),
            'd' if value <= 31 => Ok(CheckFrequency::Days(value)),
            'm' | 'h' | 'd' => Err(format!("Frequency out of range: {}", s)),
            _ => Err(format!(
                "Invalid frequency unit '{}'. Use 'm' (minutes), 'h' (hours), or 'd' (days)",
                unit
            )),
        }
    }
}

/// Scheduler service for reminder delivery and missed-day notices
pub struct SchedulerService {
    scheduler: Arc<RwLock<JobScheduler>>,
    reminders: Arc<RemindersService>,
    accountability: Arc<AccountabilityService>,
    settings: Arc<SettingsService>,
    job_ids: Arc<RwLock<Vec<Uuid>>>,
    missed_day_job: Arc<RwLock<Option<Uuid>>>,
}

impl SchedulerService {
    /// Create new scheduler service
    pub async fn new(
        reminders: RemindersService,
        accountability: AccountabilityService,
        settings: SettingsService,
    ) -> Result<Self> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::Scheduler(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self {
            scheduler: Arc::new(RwLock::new(scheduler)),
            reminders: Arc::new(reminders),
            accountability: Arc::new(accountability),
            settings: Arc::new(settings),
            job_ids: Arc::new(RwLock::new(Vec::new())),
            missed_day_job: Arc::new(RwLock::new(None)),
        })
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<()> {
        let scheduler = self.scheduler.read().await;
        scheduler
            .start()
            .await
            .map_err(|e| AppError::Scheduler(format!("Failed to start scheduler: {}", e)))?;
        tracing::info!("Notification scheduler started");
        Ok(())
    }

    /// Register the reminder job and the missed-day job, replacing any
    /// previously scheduled ones
    pub async fn schedule_jobs(&self, missed_day_frequency: CheckFrequency) -> Result<()> {
        self.cancel_jobs().await?;

        let reminders = Arc::clone(&self.reminders);
        let settings = Arc::clone(&self.settings);
        let reminder_job = Job::new_async_tz(REMINDER_CHECK_CRON, Local, move |_uuid, _l| {
            let reminders = Arc::clone(&reminders);
            let settings = Arc::clone(&settings);
            Box::pin(async move {
                match settings.notifications().await {
                    Ok(n) if !n.reminders_enabled => return,
                    Ok(_) => {}
                    Err(e) => tracing::warn!("Could not read notification settings: {}", e),
                }

                match reminders.fire_due(Local::now().naive_local()).await {
                    Ok(0) => {}
                    Ok(sent) => tracing::info!("Delivered {} reminder(s)", sent),
                    Err(e) => tracing::error!("Error checking reminders: {}", e),
                }
            })
        })
        .map_err(|e| AppError::Scheduler(format!("Failed to create reminder job: {}", e)))?;

        let cron_expr = missed_day_frequency.to_cron();
        let accountability = Arc::clone(&self.accountability);
        let settings = Arc::clone(&self.settings);
        let missed_day_job = Job::new_async_tz(cron_expr.as_str(), Local, move |_uuid, _l| {
            let accountability = Arc::clone(&accountability);
            let settings = Arc::clone(&settings);
            Box::pin(async move {
                match settings.notifications().await {
                    Ok(n) if !n.missed_day_alerts => return,
                    Ok(_) => {}
                    Err(e) => tracing::warn!("Could not read notification settings: {}", e),
                }

                tracing::debug!("Running scheduled missed-day check");
                if let Err(e) = accountability
                    .check_missed_days(Local::now().naive_local())
                    .await
                {
                    tracing::error!("Missed-day check failed: {}", e);
                }
            })
        })
        .map_err(|e| AppError::Scheduler(format!("Failed to create missed-day job: {}", e)))?;

        let missed_day_id = missed_day_job.guid();
        let ids = vec![reminder_job.guid(), missed_day_id];

        let scheduler = self.scheduler.write().await;
        for job in [reminder_job, missed_day_job] {
            scheduler
                .add(job)
                .await
                .map_err(|e| AppError::Scheduler(format!("Failed to schedule job: {}", e)))?;
        }
        drop(scheduler);

        *self.job_ids.write().await = ids;
        *self.missed_day_job.write().await = Some(missed_day_id);

        tracing::info!(
            "Reminders checked every minute; missed-day check every {} ({})",
            missed_day_frequency,
            cron_expr
        );
        Ok(())
    }

    /// Remove the scheduled jobs
    pub async fn cancel_jobs(&self) -> Result<()> {
        let mut job_ids = self.job_ids.write().await;

        if job_ids.is_empty() {
            return Ok(());
        }

        *self.missed_day_job.write().await = None;

        let scheduler = self.scheduler.write().await;
        for job_id in job_ids.drain(..) {
            scheduler
                .remove(&job_id)
                .await
                .map_err(|e| AppError::Scheduler(format!("Failed to remove job: {}", e)))?;
        }

        tracing::info!("Scheduled notification jobs cancelled");
        Ok(())
    }

    /// Local time of the next missed-day check, if one is scheduled
    pub async fn next_missed_day_check(&self) -> Result<Option<DateTime<Local>>> {
        let Some(job_id) = *self.missed_day_job.read().await else {
            return Ok(None);
        };

        let mut scheduler = self.scheduler.write().await;
        let next = scheduler
            .next_tick_for_job(job_id)
            .await
            .map_err(|e| AppError::Scheduler(format!("Failed to read next run: {}", e)))?;

        Ok(next.map(|t| t.with_timezone(&Local)))
    }

    /// Number of jobs currently registered by this service
    pub async fn job_count(&self) -> usize {
        self.job_ids.read().await.len()
    }

    /// Shutdown scheduler gracefully
    pub async fn shutdown(&self) -> Result<()> {
        let mut scheduler = self.scheduler.write().await;
        scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::Scheduler(format!("Failed to shutdown scheduler: {}", e)))?;
        tracing::info!("Notification scheduler shutdown");
        Ok(())
    }
}
