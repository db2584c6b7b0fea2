//! Journal service

use crate::config::MAX_JOURNAL_CONTENT_LENGTH;
use crate::database::{
    CreateJournalEntryRequest, JournalEntry, Repository, UpdateJournalEntryRequest,
};
use crate::error::{AppError, Result};
use crate::validation;
use chrono::Local;

fn check_content(content: &str) -> Result<String> {
    let content = content.trim();

    if content.is_empty() {
        return Err(AppError::Validation("content: is required".to_string()));
    }
    if content.chars().count() > MAX_JOURNAL_CONTENT_LENGTH {
        return Err(AppError::Validation(format!(
            "content: cannot exceed {} characters",
            MAX_JOURNAL_CONTENT_LENGTH
        )));
    }

    Ok(content.to_string())
}

/// Titles are optional on journal entries, but still length-limited
fn optional_title(title: &str) -> Result<String> {
    if title.trim().is_empty() {
        Ok(String::new())
    } else {
        validation::require_title("title", title)
    }
}

fn normalize_mood(mood: Option<&str>) -> Option<String> {
    mood.map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

/// Service for journal entries
#[derive(Clone)]
pub struct JournalService {
    repo: Repository,
}

impl JournalService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    pub async fn create_entry(&self, req: CreateJournalEntryRequest) -> Result<JournalEntry> {
        let title = optional_title(&req.title)?;
        let content = check_content(&req.content)?;
        let mood = normalize_mood(req.mood.as_deref());
        let entry_date = req.entry_date.unwrap_or_else(|| Local::now().date_naive());

        let entry = self
            .repo
            .create_journal_entry(&title, &content, mood.as_deref(), entry_date)
            .await?;

        tracing::info!("Journal entry created for {}: {}", entry_date, entry.id);
        Ok(entry)
    }

    pub async fn get_entry(&self, id: &str) -> Result<JournalEntry> {
        self.repo.get_journal_entry(id).await
    }

    pub async fn list_entries(&self) -> Result<Vec<JournalEntry>> {
        self.repo.list_journal_entries().await
    }

    pub async fn update_entry(
        &self,
        id: &str,
        req: UpdateJournalEntryRequest,
    ) -> Result<JournalEntry> {
        tracing::debug!("Updating journal entry: {}", id);

        let req = UpdateJournalEntryRequest {
            title: req.title.as_deref().map(optional_title).transpose()?,
            content: req.content.as_deref().map(check_content).transpose()?,
            mood: req
                .mood
                .map(|m| normalize_mood(Some(&m)).unwrap_or_default()),
            entry_date: req.entry_date,
        };

        self.repo.update_journal_entry(id, &req).await
    }

    pub async fn delete_entry(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting journal entry: {}", id);
        self.repo.delete_journal_entry(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::repository::test_support::create_test_repo;

    fn request(content: &str) -> CreateJournalEntryRequest {
        CreateJournalEntryRequest {
            title: String::new(),
            content: content.to_string(),
            mood: None,
            entry_date: None,
        }
    }

    #[tokio::test]
    async fn test_create_requires_content() {
        let service = JournalService::new(create_test_repo().await);

        assert!(matches!(
            service.create_entry(request("  ")).await,
            Err(AppError::Validation(_))
        ));
        assert!(service
            .create_entry(request(&"x".repeat(MAX_JOURNAL_CONTENT_LENGTH + 1)))
            .await
            .is_err());
        assert!(service.list_entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_defaults() {
        let service = JournalService::new(create_test_repo().await);

        let mut req = request(" Long walk by the river ");
        req.mood = Some("  ".to_string());
        let entry = service.create_entry(req).await.unwrap();

        assert_eq!(entry.title, "");
        assert_eq!(entry.content, "Long walk by the river");
        assert_eq!(entry.mood, None);
        assert_eq!(entry.entry_date, Local::now().date_naive());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let service = JournalService::new(create_test_repo().await);
        let entry = service.create_entry(request("Draft")).await.unwrap();

        assert!(service
            .update_entry(
                &entry.id,
                UpdateJournalEntryRequest {
                    content: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .is_err());

        let updated = service
            .update_entry(
                &entry.id,
                UpdateJournalEntryRequest {
                    title: Some("Evening".to_string()),
                    mood: Some("tired".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "Evening");
        assert_eq!(updated.content, "Draft");
        assert_eq!(updated.mood.as_deref(), Some("tired"));

        let cleared = service
            .update_entry(
                &entry.id,
                UpdateJournalEntryRequest {
                    mood: Some("   ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.mood, None);
        assert_eq!(cleared.title, "Evening");

        service.delete_entry(&entry.id).await.unwrap();
        assert!(matches!(
            service.get_entry(&entry.id).await,
            Err(AppError::JournalEntryNotFound(_))
        ));
    }
}
