//! Books collection

use std::sync::Arc;

use super::{Collection, RecordStore, BOOKS_KEY};
use crate::{error::AppResult, models::book::Book};

#[derive(Clone)]
pub struct BooksRepository {
    books: Collection<Book>,
}

impl BooksRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            books: Collection::new(store, BOOKS_KEY),
        }
    }

    pub async fn get_all(&self) -> AppResult<Vec<Book>> {
        self.books.load().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Option<Book>> {
        self.books.get_by_id(id).await
    }

    pub async fn next_id(&self) -> AppResult<i32> {
        self.books.next_id().await
    }

    /// Append a book whose id was allocated with [`Self::next_id`]
    pub async fn add(&self, book: Book) -> AppResult<()> {
        self.books.append(book).await
    }

    /// Overwrite the stored record for `id`; no-op when absent
    pub async fn update(&self, id: i32, book: Book) -> AppResult<bool> {
        self.books.update(id, book).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<usize> {
        self.books.delete(id).await
    }

    /// Books whose title or author contains `query`, ignoring case
    pub async fn search(&self, query: &str) -> AppResult<Vec<Book>> {
        let needle = query.trim().to_lowercase();
        let books = self.books.load().await?;
        Ok(books.into_iter().filter(|b| b.matches(&needle)).collect())
    }
}
