//! Data models for Pustaka

pub mod book;
pub mod history;
pub mod member;

// Re-export commonly used types
pub use book::{Book, BookStatus};
pub use history::{HistoryEntry, HistoryStatus, HistoryView};
pub use member::Member;
