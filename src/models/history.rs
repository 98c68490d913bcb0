//! Borrow/return history model

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::book::BookStatus;

/// Timestamp format used for history dates
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Kind of circulation event recorded in the history log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HistoryStatus {
    Borrowed,
    Returned,
}

impl HistoryStatus {
    /// The history event a book status change produces, if any.
    /// Only borrows and returns are logged.
    pub fn for_transition(status: BookStatus) -> Option<Self> {
        match status {
            BookStatus::Borrowed => Some(HistoryStatus::Borrowed),
            BookStatus::Returned => Some(HistoryStatus::Returned),
            BookStatus::Available | BookStatus::Reserved | BookStatus::Cancelled => None,
        }
    }
}

/// One entry of `history.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HistoryEntry {
    pub book_id: i32,
    pub member_id: i32,
    pub status: HistoryStatus,
    /// Local time, `YYYY-MM-DD HH:MM:SS`
    pub date: String,
}

/// History entry joined with the current book title and member name
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HistoryView {
    /// Position in the log, usable with `DELETE /history/{index}`
    pub index: usize,
    pub book_id: i32,
    pub book_title: Option<String>,
    pub member_id: i32,
    pub member_name: Option<String>,
    pub status: HistoryStatus,
    pub date: String,
}

/// Find the open loan for `book_id` in an insertion-ordered log.
///
/// Scans newest to oldest and stops at the first entry for the book: a
/// `borrowed` entry is the open loan, a `returned` entry means the latest
/// borrow has already been closed. Borrows and returns are not paired
/// explicitly, so reordering the log changes the answer.
pub fn find_open_loan(entries: &[HistoryEntry], book_id: i32) -> Option<&HistoryEntry> {
    entries
        .iter()
        .rev()
        .find(|e| e.book_id == book_id)
        .filter(|e| e.status == HistoryStatus::Borrowed)
}
