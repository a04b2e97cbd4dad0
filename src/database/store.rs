use serde::{de::DeserializeOwned, Serialize};
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

/// Errors from JsonFileStore
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to serialize records for {path}: {source}")]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

impl StoreError {
    /// True when the failure happened while persisting rather than loading
    pub fn is_write(&self) -> bool {
        matches!(self, StoreError::Serialize { .. } | StoreError::Write { .. })
    }
}

/// A JSON array of `T` kept in a single file.
///
/// Every load reads the whole file and every save rewrites it. A missing
/// file reads as an empty array. Clones share one lock, so `update` calls
/// from the same process never interleave.
pub struct JsonFileStore<T> {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Clone for JsonFileStore<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            lock: self.lock.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for JsonFileStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileStore").field("path", &self.path).finish()
    }
}

impl<T> JsonFileStore<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record
    pub async fn load(&self) -> Result<Vec<T>, StoreError> {
        let _guard = self.lock.lock().await;
        self.read().await
    }

    /// Replace the file contents with `records`
    pub async fn save(&self, records: &[T]) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        self.write(records).await
    }

    /// Load, let `f` mutate the records, then save them back.
    ///
    /// Nothing is written when `f` returns an error.
    pub async fn update<R, E, F>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R, E>,
        E: From<StoreError>,
    {
        let _guard = self.lock.lock().await;
        let mut records = self.read().await?;
        let out = f(&mut records)?;
        self.write(&records).await?;
        Ok(out)
    }

    async fn read(&self) -> Result<Vec<T>, StoreError> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "store file missing, treating as empty");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        // An empty file is an empty array too
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&data).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn write(&self, records: &[T]) -> Result<(), StoreError> {
        let data = serde_json::to_vec(records).map_err(|source| StoreError::Serialize {
            path: self.path.clone(),
            source,
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StoreError::Write {
                    path: self.path.clone(),
                    source,
                })?;
        }

        // Readers never see a half-written file
        let tmp = self.tmp_path();
        let written = match tokio::fs::write(&tmp, data).await {
            Ok(()) => tokio::fs::rename(&tmp, &self.path).await,
            Err(e) => Err(e),
        };
        written.map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        debug!(path = %self.path.display(), count = records.len(), "store file written");
        Ok(())
    }
}
