use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tokio::sync::RwLock;

const MAX_FILENAME_LEN: usize = 255;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FileStoreError {
    #[error("File not found: {0}")]
    NotFound(i64),

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub id: i64,
    pub filename: String,
    pub content_type: String,
    pub size: u64,
    /// Hex-encoded SHA-256 of the content.
    pub checksum: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug)]
struct Inner {
    next_id: i64,
    by_id: BTreeMap<i64, FileMetadata>,
    by_filename: HashMap<String, i64>,
}

/// In-memory file metadata keyed by id and by filename.
///
/// Id assignment and both index updates happen under one write lock, so a
/// filename always maps to exactly one record.
#[derive(Debug)]
pub struct FileMetadataStore {
    inner: RwLock<Inner>,
}

impl Default for FileMetadataStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FileMetadataStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_id: 1,
                by_id: BTreeMap::new(),
                by_filename: HashMap::new(),
            }),
        }
    }

    /// Stores metadata for `content`. Re-saving a filename replaces its
    /// record and keeps the id.
    pub async fn save(&self, filename: &str, content_type: &str, content: &[u8]) -> Result<FileMetadata, FileStoreError> {
        validate_filename(filename)?;

        let mut hasher = Sha256::new();
        hasher.update(content);
        let checksum = format!("{:x}", hasher.finalize());

        let mut inner = self.inner.write().await;
        let existing = inner.by_filename.get(filename).copied();
        let id = match existing {
            Some(id) => id,
            None => {
                let id = inner.next_id;
                inner.next_id += 1;
                inner.by_filename.insert(filename.to_string(), id);
                id
            }
        };

        let metadata = FileMetadata {
            id,
            filename: filename.to_string(),
            content_type: content_type.to_string(),
            size: content.len() as u64,
            checksum,
            uploaded_at: Utc::now(),
        };
        inner.by_id.insert(id, metadata.clone());
        tracing::debug!("Stored file metadata {} ({} bytes) as id {}", filename, metadata.size, id);
        Ok(metadata)
    }

    pub async fn get(&self, id: i64) -> Result<FileMetadata, FileStoreError> {
        let inner = self.inner.read().await;
        inner.by_id.get(&id).cloned().ok_or(FileStoreError::NotFound(id))
    }

    /// All records in id order.
    pub async fn list(&self) -> Vec<FileMetadata> {
        let inner = self.inner.read().await;
        inner.by_id.values().cloned().collect()
    }

    pub async fn delete(&self, id: i64) -> Result<FileMetadata, FileStoreError> {
        let mut inner = self.inner.write().await;
        let metadata = inner.by_id.remove(&id).ok_or(FileStoreError::NotFound(id))?;
        inner.by_filename.remove(&metadata.filename);
        Ok(metadata)
    }
}

fn validate_filename(filename: &str) -> Result<(), FileStoreError> {
    let invalid = filename.is_empty()
        || filename.len() > MAX_FILENAME_LEN
        || filename == "."
        || filename == ".."
        || filename.contains(['/', '\\', '\0']);
    if invalid {
        return Err(FileStoreError::InvalidFilename(filename.to_string()));
    }
    Ok(())
}
