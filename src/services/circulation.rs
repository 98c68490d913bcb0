//! Circulation: book status transitions and the borrow/return log.
//!
//! Every status change goes through [`CirculationService::request_status_change`],
//! which checks the transition table on [`BookStatus`], verifies returns
//! against the open loan in the history log, then persists the book and
//! (for borrows and returns only) appends a history entry.
//!
//! Nothing here locks: two concurrent requests on the same book can both
//! pass validation against the same prior state, and whichever saves last
//! wins.

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookStatus, BookTransitions},
        history::{find_open_loan, HistoryEntry, HistoryStatus},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CirculationService {
    repository: Repository,
}

impl CirculationService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    async fn load_book(&self, book_id: i32) -> AppResult<Book> {
        self.repository
            .books
            .get_by_id(book_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", book_id)))
    }

    /// Move a book to `new_status` on behalf of `member_id`
    pub async fn request_status_change(
        &self,
        book_id: i32,
        new_status: BookStatus,
        member_id: i32,
    ) -> AppResult<Book> {
        let mut book = self.load_book(book_id).await?;
        let current = book.status;

        if !current.can_transition_to(new_status) {
            tracing::warn!(book_id, %current, attempted = %new_status, "Rejected status change");
            return Err(AppError::InvalidTransition {
                current,
                attempted: new_status,
            });
        }

        if new_status == BookStatus::Returned {
            let history = self.repository.history.get_all().await?;
            let loan = find_open_loan(&history, book_id).ok_or(AppError::NoActiveLoan(book_id))?;
            if loan.member_id != member_id {
                tracing::warn!(book_id, member_id, owner_id = loan.member_id, "Return by non-borrower");
                return Err(AppError::NotLoanOwner {
                    book_id,
                    member_id,
                    owner_id: loan.member_id,
                });
            }
        }

        book.status = new_status;
        self.repository.books.update(book_id, book.clone()).await?;

        if let Some(event) = HistoryStatus::for_transition(new_status) {
            self.repository.history.add(book_id, member_id, event).await?;
        }

        tracing::info!(book_id, member_id, from = %current, to = %new_status, "Book status changed");
        Ok(book)
    }

    /// The borrow entry currently holding `book_id`, if any
    pub async fn open_loan(&self, book_id: i32) -> AppResult<Option<HistoryEntry>> {
        self.load_book(book_id).await?;
        let history = self.repository.history.get_all().await?;
        Ok(find_open_loan(&history, book_id).cloned())
    }

    /// Current status of a book and the statuses it may legally move to
    pub async fn allowed_transitions(&self, book_id: i32) -> AppResult<BookTransitions> {
        let book = self.load_book(book_id).await?;
        Ok(BookTransitions {
            book_id,
            current: book.status,
            allowed: book.status.allowed_next().to_vec(),
        })
    }
}
