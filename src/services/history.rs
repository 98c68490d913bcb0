//! History log service

use std::collections::HashMap;

use crate::{
    error::{AppError, AppResult},
    models::history::{HistoryEntry, HistoryView},
    repository::Repository,
};

#[derive(Clone)]
pub struct HistoryService {
    repository: Repository,
}

impl HistoryService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Raw log in insertion order
    pub async fn list(&self) -> AppResult<Vec<HistoryEntry>> {
        self.repository.history.get_all().await
    }

    /// Log entries joined with the current book titles and member names.
    /// References to deleted books or members resolve to `None`.
    pub async fn list_views(&self) -> AppResult<Vec<HistoryView>> {
        let entries = self.repository.history.get_all().await?;
        let titles: HashMap<i32, String> = self
            .repository
            .books
            .get_all()
            .await?
            .into_iter()
            .map(|b| (b.id, b.title))
            .collect();
        let names: HashMap<i32, String> = self
            .repository
            .members
            .get_all()
            .await?
            .into_iter()
            .map(|m| (m.id, m.name))
            .collect();

        Ok(entries
            .into_iter()
            .enumerate()
            .map(|(index, e)| HistoryView {
                index,
                book_id: e.book_id,
                book_title: titles.get(&e.book_id).cloned(),
                member_id: e.member_id,
                member_name: names.get(&e.member_id).cloned(),
                status: e.status,
                date: e.date,
            })
            .collect())
    }

    /// Remove the entry at `index` (0-based insertion position)
    pub async fn delete_at(&self, index: i64) -> AppResult<HistoryEntry> {
        let mut entries = self.repository.history.get_all().await?;
        let len = entries.len();
        let position = usize::try_from(index)
            .ok()
            .filter(|&i| i < len)
            .ok_or(AppError::IndexOutOfRange { index, len })?;

        let removed = entries.remove(position);
        self.repository.history.save_all(&entries).await?;

        tracing::info!(index, book_id = removed.book_id, "History entry deleted");
        Ok(removed)
    }
}
