//! Record stores: where each named collection of records lives.
//!
//! A store only knows about ordered lists of untyped JSON records. Typed
//! access is layered on top by [`super::Collection`].

use std::{
    collections::HashMap,
    ffi::OsString,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Serializer, Value};
use tokio::{fs, io::AsyncWriteExt, sync::RwLock};

use crate::{config::StorageConfig, error::AppResult};

/// Persistence capability backing every repository.
///
/// There is no locking between a `load` and the following `save`: callers
/// doing read-modify-write race, and the last `save` wins.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Load every record stored under `key`, in insertion order.
    /// A collection that was never saved loads as empty.
    async fn load(&self, key: &str) -> AppResult<Vec<Value>>;

    /// Replace the whole collection stored under `key`.
    async fn save(&self, key: &str, records: &[Value]) -> AppResult<()>;
}

/// In-memory store, used by tests and throwaway instances
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn load(&self, key: &str) -> AppResult<Vec<Value>> {
        let collections = self.collections.read().await;
        Ok(collections.get(key).cloned().unwrap_or_default())
    }

    async fn save(&self, key: &str, records: &[Value]) -> AppResult<()> {
        let mut collections = self.collections.write().await;
        collections.insert(key.to_string(), records.to_vec());
        Ok(())
    }
}

/// Store keeping one JSON array file per collection inside a data directory
pub struct JsonFileStore {
    data_dir: PathBuf,
    files: HashMap<String, String>,
}

impl JsonFileStore {
    /// Create a store rooted at `data_dir`. Keys without an explicit file
    /// name are stored as `<key>.json`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            files: HashMap::new(),
        }
    }

    /// Build the store described by the storage configuration
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.data_dir)
            .with_file(super::BOOKS_KEY, &config.books_file)
            .with_file(super::MEMBERS_KEY, &config.members_file)
            .with_file(super::HISTORY_KEY, &config.history_file)
    }

    /// Map `key` to a specific file name inside the data directory
    pub fn with_file(mut self, key: &str, file_name: &str) -> Self {
        self.files.insert(key.to_string(), file_name.to_string());
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Full path of the file backing `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        match self.files.get(key) {
            Some(file_name) => self.data_dir.join(file_name),
            None => self.data_dir.join(format!("{}.json", key)),
        }
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn load(&self, key: &str) -> AppResult<Vec<Value>> {
        let path = self.path_for(key);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("{} does not exist yet, loading empty collection", path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        let records: Vec<Value> = serde_json::from_slice(&bytes)?;
        tracing::debug!("Loaded {} records from {}", records.len(), path.display());
        Ok(records)
    }

    async fn save(&self, key: &str, records: &[Value]) -> AppResult<()> {
        fs::create_dir_all(&self.data_dir).await?;

        let path = self.path_for(key);
        let contents = to_indented_json(records)?;
        let tmp_path = tmp_write_path(&path);

        if let Err(e) = write_synced(&tmp_path, &contents).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }

        // Readers see either the old file or the new one, never a partial write
        if let Err(e) = fs::rename(&tmp_path, &path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }

        tracing::debug!("Saved {} records to {}", records.len(), path.display());
        Ok(())
    }
}

async fn write_synced(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(contents).await?;
    file.flush().await?;
    file.sync_all().await
}

fn to_indented_json(records: &[Value]) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    records.serialize(&mut serializer)?;
    Ok(buf)
}

fn tmp_write_path(path: &Path) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let mut tmp: OsString = path.as_os_str().to_os_string();
    tmp.push(format!(".tmp.{}.{}", std::process::id(), unique));
    PathBuf::from(tmp)
}
