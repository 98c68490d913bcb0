//! History log collection

use std::sync::Arc;

use chrono::Local;

use super::{Collection, RecordStore, HISTORY_KEY};
use crate::{
    error::AppResult,
    models::history::{HistoryEntry, HistoryStatus, DATE_FORMAT},
};

#[derive(Clone)]
pub struct HistoryRepository {
    entries: Collection<HistoryEntry>,
}

impl HistoryRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            entries: Collection::new(store, HISTORY_KEY),
        }
    }

    /// Every entry in insertion order
    pub async fn get_all(&self) -> AppResult<Vec<HistoryEntry>> {
        self.entries.load().await
    }

    /// Append an entry stamped with the current local time
    pub async fn add(&self, book_id: i32, member_id: i32, status: HistoryStatus) -> AppResult<HistoryEntry> {
        let entry = HistoryEntry {
            book_id,
            member_id,
            status,
            date: Local::now().format(DATE_FORMAT).to_string(),
        };
        self.entries.append(entry.clone()).await?;
        Ok(entry)
    }

    /// Replace the whole log
    pub async fn save_all(&self, entries: &[HistoryEntry]) -> AppResult<()> {
        self.entries.save(entries).await
    }
}
