//! Repository layer over the record store

pub mod books;
pub mod history;
pub mod members;
pub mod store;

use std::{marker::PhantomData, sync::Arc};

use serde::{de::DeserializeOwned, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::{Book, Member},
};

pub use store::{JsonFileStore, MemoryStore, RecordStore};

pub const BOOKS_KEY: &str = "books";
pub const MEMBERS_KEY: &str = "members";
pub const HISTORY_KEY: &str = "history";

/// Records addressed by an integer id
pub trait Keyed {
    fn id(&self) -> i32;
}

impl Keyed for Book {
    fn id(&self) -> i32 {
        self.id
    }
}

impl Keyed for Member {
    fn id(&self) -> i32 {
        self.id
    }
}

/// Typed view of one named collection in a record store.
///
/// Every write loads the full collection, changes it, and saves it back.
pub struct Collection<T> {
    store: Arc<dyn RecordStore>,
    key: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            key: self.key,
            _marker: PhantomData,
        }
    }
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(store: Arc<dyn RecordStore>, key: &'static str) -> Self {
        Self {
            store,
            key,
            _marker: PhantomData,
        }
    }

    /// Load and decode every record
    pub async fn load(&self) -> AppResult<Vec<T>> {
        self.store
            .load(self.key)
            .await?
            .into_iter()
            .map(|value| serde_json::from_value::<T>(value).map_err(AppError::from))
            .collect()
    }

    /// Encode and save the whole collection
    pub async fn save(&self, records: &[T]) -> AppResult<()> {
        let values = records
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        self.store.save(self.key, &values).await
    }

    pub async fn append(&self, record: T) -> AppResult<()> {
        let mut records = self.load().await?;
        records.push(record);
        self.save(&records).await
    }
}

impl<T> Collection<T>
where
    T: Keyed + Serialize + DeserializeOwned,
{
    pub async fn get_by_id(&self, id: i32) -> AppResult<Option<T>> {
        Ok(self.load().await?.into_iter().find(|r| r.id() == id))
    }

    /// Next free id: one past the largest existing id, 1 when empty
    pub async fn next_id(&self) -> AppResult<i32> {
        let records = self.load().await?;
        records
            .iter()
            .map(Keyed::id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| AppError::Internal(format!("No ids left in collection '{}'", self.key)))
    }

    /// Replace the first record with `id`. Returns false (and writes
    /// nothing) when no record matches.
    pub async fn update(&self, id: i32, record: T) -> AppResult<bool> {
        let mut records = self.load().await?;
        match records.iter_mut().find(|r| r.id() == id) {
            Some(slot) => {
                *slot = record;
                self.save(&records).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove every record with `id`. Returns how many were removed;
    /// removing nothing is not an error.
    pub async fn delete(&self, id: i32) -> AppResult<usize> {
        let mut records = self.load().await?;
        let before = records.len();
        records.retain(|r| r.id() != id);
        let removed = before - records.len();
        self.save(&records).await?;
        Ok(removed)
    }
}

/// Main repository struct holding every collection over one store
#[derive(Clone)]
pub struct Repository {
    pub store: Arc<dyn RecordStore>,
    pub books: books::BooksRepository,
    pub members: members::MembersRepository,
    pub history: history::HistoryRepository,
}

impl Repository {
    /// Create a new repository over the given record store
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            books: books::BooksRepository::new(store.clone()),
            members: members::MembersRepository::new(store.clone()),
            history: history::HistoryRepository::new(store.clone()),
            store,
        }
    }

    /// Repository over a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Check that every collection can be read
    pub async fn ping(&self) -> AppResult<()> {
        for key in [BOOKS_KEY, MEMBERS_KEY, HISTORY_KEY] {
            self.store.load(key).await?;
        }
        Ok(())
    }
}
