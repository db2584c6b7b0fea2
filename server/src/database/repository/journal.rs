//! Journal persistence

use super::Repository;
use crate::database::models::*;
use crate::error::{AppError, Result};
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

impl Repository {
    /// Create a journal entry for `entry_date`
    pub async fn create_journal_entry(
        &self,
        title: &str,
        content: &str,
        mood: Option<&str>,
        entry_date: NaiveDate,
    ) -> Result<JournalEntry> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let entry = sqlx::query_as::<_, JournalEntry>(
            r#"
            INSERT INTO journal_entries (id, title, content, mood, entry_date, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(title)
        .bind(content)
        .bind(mood)
        .bind(entry_date)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created journal entry: {}", id);
        Ok(entry)
    }

    /// Get a journal entry by ID
    pub async fn get_journal_entry(&self, id: &str) -> Result<JournalEntry> {
        sqlx::query_as::<_, JournalEntry>("SELECT * FROM journal_entries WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::JournalEntryNotFound(id.to_string()))
    }

    /// List journal entries, newest day first
    pub async fn list_journal_entries(&self) -> Result<Vec<JournalEntry>> {
        let entries = sqlx::query_as::<_, JournalEntry>(
            "SELECT * FROM journal_entries ORDER BY entry_date DESC, created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Partially update a journal entry
    pub async fn update_journal_entry(
        &self,
        id: &str,
        req: &UpdateJournalEntryRequest,
    ) -> Result<JournalEntry> {
        let mut query = "UPDATE journal_entries SET updated_at = ?".to_string();
        let mut params: Vec<String> = vec![Utc::now().to_rfc3339()];

        if let Some(title) = &req.title {
            query.push_str(", title = ?");
            params.push(title.clone());
        }

        if let Some(content) = &req.content {
            query.push_str(", content = ?");
            params.push(content.clone());
        }

        // An empty mood clears it
        if let Some(mood) = &req.mood {
            query.push_str(", mood = NULLIF(?, '')");
            params.push(mood.clone());
        }

        if let Some(entry_date) = &req.entry_date {
            query.push_str(", entry_date = ?");
            params.push(entry_date.format("%Y-%m-%d").to_string());
        }

        query.push_str(" WHERE id = ?");
        params.push(id.to_string());

        let mut q = sqlx::query(&query);
        for param in &params {
            q = q.bind(param);
        }

        if q.execute(&self.pool).await?.rows_affected() == 0 {
            return Err(AppError::JournalEntryNotFound(id.to_string()));
        }

        self.get_journal_entry(id).await
    }

    /// Delete a journal entry
    pub async fn delete_journal_entry(&self, id: &str) -> Result<()> {
        let rows = sqlx::query("DELETE FROM journal_entries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::JournalEntryNotFound(id.to_string()));
        }

        tracing::debug!("Deleted journal entry: {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::create_test_repo;
    use crate::database::models::*;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_journal_crud() {
        let repo = create_test_repo().await;
        let day = NaiveDate::from_ymd_opt(2026, 2, 14).unwrap();

        let entry = repo
            .create_journal_entry("Morning", "Slept well", Some("calm"), day)
            .await
            .unwrap();
        assert_eq!(entry.entry_date, day);

        let updated = repo
            .update_journal_entry(
                &entry.id,
                &UpdateJournalEntryRequest {
                    content: Some("Slept very well".to_string()),
                    entry_date: Some(day.succ_opt().unwrap()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.content, "Slept very well");
        assert_eq!(updated.title, "Morning");
        assert_eq!(updated.entry_date, day.succ_opt().unwrap());

        repo.delete_journal_entry(&entry.id).await.unwrap();
        assert!(repo.get_journal_entry(&entry.id).await.is_err());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let repo = create_test_repo().await;
        let older = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let newer = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();

        repo.create_journal_entry("", "old", None, older).await.unwrap();
        repo.create_journal_entry("", "new", None, newer).await.unwrap();

        let entries = repo.list_journal_entries().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].content, "new");
    }
}
