//! Append-only list of wrong answers, persisted as one JSON array.

use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::utils::time::iso_timestamp;

#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("{path} does not contain a JSON array: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode wrong answers: {0}")]
    Encode(#[from] serde_json::Error),
}

pub struct WrongBook {
    path: PathBuf,
    // read-modify-write of the whole file must not interleave
    write_lock: Mutex<()>,
}

impl WrongBook {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored records, or an empty list when nothing was saved yet.
    pub async fn load(&self) -> Result<Vec<Value>, RecorderError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(RecorderError::Read {
                    path: self.display_path(),
                    source,
                })
            }
        };

        serde_json::from_slice(&raw).map_err(|source| RecorderError::Decode {
            path: self.display_path(),
            source,
        })
    }

    /// Stamps `time`, appends the record and returns the new total.
    pub async fn save(&self, mut record: Map<String, Value>) -> Result<usize, RecorderError> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.load().await?;
        record.insert("time".to_string(), Value::String(iso_timestamp(Utc::now())));
        records.push(Value::Object(record));

        let body = serde_json::to_string_pretty(&records)?;
        tokio::fs::write(&self.path, body)
            .await
            .map_err(|source| RecorderError::Write {
                path: self.display_path(),
                source,
            })?;

        tracing::info!(
            "Wrong answer saved to {}, total={}",
            self.path.display(),
            records.len()
        );

        Ok(records.len())
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}
