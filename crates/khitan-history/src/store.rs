use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use khitan_core::Direction;

use crate::record::HistoryRecord;

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("Failed to write history to {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("Failed to encode history: {0}")]
    Encode(#[from] serde_json::Error),
}

/// History persistence interface
pub trait HistoryRepository: Send + Sync {
    /// All records, most recent first. Never fails: unreadable storage is empty.
    fn list(&self) -> Vec<HistoryRecord>;

    /// Record a finished query and return the stored record
    fn insert(
        &self,
        query: &str,
        mode: Direction,
        result: &str,
        context_count: usize,
    ) -> Result<HistoryRecord, HistoryError>;

    /// Remove one record. Returns false when the id is unknown.
    fn delete(&self, id: &str) -> Result<bool, HistoryError>;

    /// Remove every record
    fn clear(&self) -> Result<(), HistoryError>;

    fn get(&self, id: &str) -> Option<HistoryRecord> {
        self.list().into_iter().find(|r| r.id == id)
    }
}

/// JSON array on disk, rewritten in full on every mutation.
/// The mutex makes each read-modify-write a single writer.
pub struct JsonHistoryStore {
    path: PathBuf,
    capacity: usize,
    write_lock: Mutex<()>,
}

impl JsonHistoryStore {
    pub fn new(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            path: path.into(),
            capacity,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn read(&self) -> Vec<HistoryRecord> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!("History at {} unreadable, treating as empty: {}", self.path.display(), e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&data) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("History at {} is corrupt, treating as empty: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }

    fn write(&self, records: &[HistoryRecord]) -> Result<(), HistoryError> {
        let json = serde_json::to_string_pretty(records)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| HistoryError::Write {
                path: self.path.clone(),
                source,
            })?;
        }

        fs::write(&self.path, json).map_err(|source| HistoryError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

impl HistoryRepository for JsonHistoryStore {
    fn list(&self) -> Vec<HistoryRecord> {
        let _guard = self.lock();
        self.read()
    }

    fn insert(
        &self,
        query: &str,
        mode: Direction,
        result: &str,
        context_count: usize,
    ) -> Result<HistoryRecord, HistoryError> {
        let _guard = self.lock();

        let record = HistoryRecord::new(query, mode, result, context_count);
        let mut records = self.read();
        records.insert(0, record.clone());
        records.truncate(self.capacity);
        self.write(&records)?;

        tracing::debug!("Saved history record {} ({} kept)", record.id, records.len());
        Ok(record)
    }

    fn delete(&self, id: &str) -> Result<bool, HistoryError> {
        let _guard = self.lock();

        let mut records = self.read();
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Ok(false);
        }

        self.write(&records)?;
        Ok(true)
    }

    fn clear(&self) -> Result<(), HistoryError> {
        let _guard = self.lock();

        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(HistoryError::Write {
                path: self.path.clone(),
                source,
            }),
        }
    }
}
