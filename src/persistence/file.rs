//! File gateway
//!
//! One JSON document per key inside a data directory. Writes go to a
//! temporary file first and are renamed into place, so a crash mid-write
//! leaves the previous document intact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error};

use super::PersistenceGateway;
use crate::utils::errors::{PersistenceError, PersistenceResult};

#[derive(Debug, Clone)]
pub struct FileGateway {
    directory: PathBuf,
    prefix: String,
}

impl FileGateway {
    pub fn new(directory: impl AsRef<Path>, prefix: &str) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            prefix: prefix.to_string(),
        }
    }

    /// File backing a key; characters unsafe in file names become '_'
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = format!("{}{}", self.prefix, key)
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.directory.join(format!("{}.json", name))
    }

    fn io_error(key: &str, source: std::io::Error) -> PersistenceError {
        PersistenceError::Io {
            key: key.to_string(),
            source,
        }
    }
}

#[async_trait]
impl PersistenceGateway for FileGateway {
    async fn save(&self, key: &str, value: &Value) -> PersistenceResult<()> {
        let path = self.path_for(key);
        let temp_path = path.with_extension("json.tmp");

        let serialized = serde_json::to_vec_pretty(value).map_err(|source| {
            PersistenceError::Serialization {
                key: key.to_string(),
                source,
            }
        })?;

        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|e| Self::io_error(key, e))?;

        if let Err(e) = tokio::fs::write(&temp_path, &serialized).await {
            error!(key = key, path = %temp_path.display(), error = %e, "Failed to write temporary file");
            return Err(Self::io_error(key, e));
        }

        tokio::fs::rename(&temp_path, &path)
            .await
            .map_err(|e| Self::io_error(key, e))?;

        debug!(key = key, path = %path.display(), bytes = serialized.len(), "Value written to file");
        Ok(())
    }

    async fn load(&self, key: &str) -> PersistenceResult<Option<Value>> {
        let path = self.path_for(key);

        let data = match tokio::fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(key = key, "No file stored for key");
                return Ok(None);
            }
            Err(e) => return Err(Self::io_error(key, e)),
        };

        let value = serde_json::from_slice(&data).map_err(|source| PersistenceError::Serialization {
            key: key.to_string(),
            source,
        })?;

        Ok(Some(value))
    }

    fn backend(&self) -> &'static str {
        "file"
    }
}
