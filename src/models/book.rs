//! Book model and the status transition table

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Circulation status of a book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BookStatus {
    Available,
    Borrowed,
    Reserved,
    Returned,
    Cancelled,
}

impl BookStatus {
    pub const ALL: [BookStatus; 5] = [
        BookStatus::Available,
        BookStatus::Borrowed,
        BookStatus::Reserved,
        BookStatus::Returned,
        BookStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Available => "available",
            BookStatus::Borrowed => "borrowed",
            BookStatus::Reserved => "reserved",
            BookStatus::Returned => "returned",
            BookStatus::Cancelled => "cancelled",
        }
    }

    /// States a book in this status may legally move to next
    pub fn allowed_next(&self) -> &'static [BookStatus] {
        match self {
            BookStatus::Available => &[BookStatus::Borrowed, BookStatus::Reserved],
            BookStatus::Borrowed => &[BookStatus::Returned],
            BookStatus::Reserved => &[BookStatus::Borrowed, BookStatus::Cancelled],
            BookStatus::Returned => &[BookStatus::Available],
            BookStatus::Cancelled => &[BookStatus::Available],
        }
    }

    pub fn can_transition_to(&self, next: BookStatus) -> bool {
        self.allowed_next().contains(&next)
    }
}

impl Default for BookStatus {
    fn default() -> Self {
        BookStatus::Available
    }
}

impl std::fmt::Display for BookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Book record as persisted in `books.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub status: BookStatus,
}

impl Book {
    /// Case-insensitive substring match over title or author.
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.author.to_lowercase().contains(needle)
    }
}

/// Create book request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateBook {
    pub title: String,
    pub author: String,
}

/// Book list / search query
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Case-insensitive search over title and author
    pub q: Option<String>,
}

/// Current status of a book together with the statuses it may move to
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookTransitions {
    pub book_id: i32,
    pub current: BookStatus,
    pub allowed: Vec<BookStatus>,
}
