// src/services/json_store.rs

use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};

use crate::error::QuizError;

/// Append-only list of records kept as one pretty-printed JSON array on disk.
///
/// Every append is a full read-modify-write with no locking: concurrent writers
/// (other processes, or overlapping requests) can lose each other's updates.
#[derive(Debug, Clone)]
pub struct JsonFileStore<T> {
    path: PathBuf,
    _record: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> JsonFileStore<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records in insertion order; empty if the file does not exist yet.
    pub async fn load_all(&self) -> Result<Vec<T>, QuizError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) if raw.trim().is_empty() => Ok(Vec::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Appends one record and returns the new record count.
    pub async fn append(&self, record: T) -> Result<usize, QuizError> {
        let mut records = self.load_all().await?;
        records.push(record);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let body = serde_json::to_string_pretty(&records)?;
        tokio::fs::write(&self.path, body).await?;
        Ok(records.len())
    }
}
