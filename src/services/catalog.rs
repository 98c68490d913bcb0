//! Book catalog service

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookStatus, CreateBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List every book
    pub async fn list(&self) -> AppResult<Vec<Book>> {
        self.repository.books.get_all().await
    }

    /// Case-insensitive search over title and author; a blank query lists everything
    pub async fn search(&self, query: &str) -> AppResult<Vec<Book>> {
        if query.trim().is_empty() {
            return self.list().await;
        }
        self.repository.books.search(query).await
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        self.repository
            .books
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    /// Register a new book; it starts out available
    pub async fn create(&self, data: &CreateBook) -> AppResult<Book> {
        let title = data.title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("Book title cannot be empty".to_string()));
        }
        let author = data.author.trim();
        if author.is_empty() {
            return Err(AppError::Validation("Book author cannot be empty".to_string()));
        }

        let book = Book {
            id: self.repository.books.next_id().await?,
            title: title.to_string(),
            author: author.to_string(),
            status: BookStatus::Available,
        };
        self.repository.books.add(book.clone()).await?;

        tracing::info!(book_id = book.id, "Book '{}' registered", book.title);
        Ok(book)
    }

    /// Delete a book. Deleting an unknown id succeeds.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let removed = self.repository.books.delete(id).await?;
        tracing::info!(book_id = id, removed, "Book deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(title: &str, author: &str) -> CreateBook {
        CreateBook {
            title: title.to_string(),
            author: author.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_allocates_sequential_ids() {
        let catalog = CatalogService::new(Repository::in_memory());

        let first = catalog.create(&create("Bumi Manusia", "Pramoedya Ananta Toer")).await.unwrap();
        let second = catalog.create(&create("  Laskar Pelangi ", "Andrea Hirata")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(first.status, BookStatus::Available);
        assert_eq!(second.id, 2);
        assert_eq!(second.title, "Laskar Pelangi");

        catalog.delete(1).await.unwrap();
        let third = catalog.create(&create("Ca Bau Kan", "Remy Sylado")).await.unwrap();
        assert_eq!(third.id, 3);
    }

    #[tokio::test]
    async fn test_create_rejects_empty_fields_without_persisting() {
        let catalog = CatalogService::new(Repository::in_memory());

        let err = catalog.create(&create("", "Author")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        let err = catalog.create(&create("Title", "   ")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        assert!(catalog.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_reports_exhausted_ids_without_persisting() {
        let repository = Repository::in_memory();
        repository
            .books
            .add(Book {
                id: i32::MAX,
                title: "Arus Balik".to_string(),
                author: "Pramoedya Ananta Toer".to_string(),
                status: BookStatus::Available,
            })
            .await
            .unwrap();
        let catalog = CatalogService::new(repository);

        let err = catalog.create(&create("Saman", "Ayu Utami")).await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(catalog.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_and_delete() {
        let catalog = CatalogService::new(Repository::in_memory());
        let book = catalog.create(&create("Ronggeng Dukuh Paruk", "Ahmad Tohari")).await.unwrap();

        assert_eq!(catalog.get_by_id(book.id).await.unwrap(), book);
        catalog.delete(book.id).await.unwrap();
        assert!(matches!(catalog.get_by_id(book.id).await, Err(AppError::NotFound(_))));
        // deleting again is not an error
        catalog.delete(book.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_search_blank_query_lists_all() {
        let catalog = CatalogService::new(Repository::in_memory());
        catalog.create(&create("Cantik Itu Luka", "Eka Kurniawan")).await.unwrap();
        catalog.create(&create("Lelaki Harimau", "Eka Kurniawan")).await.unwrap();
        catalog.create(&create("Saman", "Ayu Utami")).await.unwrap();

        assert_eq!(catalog.search("  ").await.unwrap().len(), 3);
        assert_eq!(catalog.search("kurniawan").await.unwrap().len(), 2);
        assert_eq!(catalog.search("SAMAN").await.unwrap().len(), 1);
    }
}
