//! JSON file storage backend.
//!
//! The whole collection lives in a single UTF-8 JSON array. Every save
//! rewrites the file through a temp-file-then-rename sequence:
//!
//! 1. serialize the collection to a temp file in the same directory
//! 2. flush and fsync the temp file
//! 3. atomically rename it onto the canonical path
//!
//! A crash before step 3 leaves the canonical file untouched; readers only
//! ever see the fully-old or the fully-new collection.
//!
//! # Retries
//!
//! Transient conditions reported by the filesystem (busy, would block,
//! interrupted, timed out) are retried with exponential backoff using
//! `backon` on the tokio timer. Everything else (permission denied, disk
//! full, ...) fails on the first attempt.
//!
//! # Blocking I/O
//!
//! File operations are synchronous and run inside
//! `tokio::task::spawn_blocking`; serialization happens on the async side.

use crate::core::error::StorageError;
use crate::core::service::CollectionStore;
use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::future::Future;
use std::io::{self, ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Backoff settings for transient write failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: usize,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            min_delay: Duration::from_millis(20),
            max_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Exponential backoff matching this policy
    pub fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_attempts.saturating_sub(1))
    }
}

/// JSON-file-backed implementation of [`CollectionStore`].
///
/// # Example
///
/// ```rust,ignore
/// use enroll::storage::JsonFileStore;
///
/// let store = JsonFileStore::<RegistrationRecord>::new("data/users.json");
/// let records = store.load().await?;
/// ```
pub struct JsonFileStore<T> {
    path: PathBuf,
    retry: RetryPolicy,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            retry: RetryPolicy::default(),
            _marker: PhantomData,
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Canonical location of the collection
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl<T> CollectionStore<T> for JsonFileStore<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    async fn load(&self) -> Result<Vec<T>, StorageError> {
        let path = self.path.clone();
        let bytes = tokio::task::spawn_blocking(move || read_if_exists(&path))
            .await
            .map_err(|e| StorageError::Unavailable {
                message: e.to_string(),
            })?
            .map_err(|e| StorageError::Io {
                operation: "read",
                path: self.path.display().to_string(),
                message: e.to_string(),
            })?;

        let Some(bytes) = bytes else {
            return Ok(Vec::new());
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&bytes).map_err(|e| StorageError::Corrupt {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })
    }

    async fn save(&self, records: &[T]) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(records).map_err(|e| StorageError::Serialization {
            message: e.to_string(),
        })?;
        let bytes = Arc::new(bytes);

        retry_transient(&self.retry, &self.path, || {
            let bytes = bytes.clone();
            let path = self.path.clone();
            async move {
                tokio::task::spawn_blocking(move || write_atomic(&path, &bytes))
                    .await
                    .map_err(io::Error::other)?
            }
        })
        .await?;

        debug!(path = %self.path.display(), records = records.len(), "collection persisted");
        Ok(())
    }
}

/// Whether an I/O failure is worth another attempt
pub fn is_transient(err: &io::Error) -> bool {
    if matches!(
        err.kind(),
        ErrorKind::WouldBlock | ErrorKind::ResourceBusy | ErrorKind::Interrupted | ErrorKind::TimedOut
    ) {
        return true;
    }

    // ERROR_SHARING_VIOLATION / ERROR_LOCK_VIOLATION surface as PermissionDenied
    #[cfg(windows)]
    if matches!(err.raw_os_error(), Some(32) | Some(33)) {
        return true;
    }

    false
}

/// Run `op` until it succeeds, fails permanently, or the policy runs out
pub(crate) async fn retry_transient<R, F, Fut>(
    policy: &RetryPolicy,
    path: &Path,
    op: F,
) -> Result<R, StorageError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<R>>,
{
    op.retry(policy.backoff())
        .when(is_transient)
        .notify(|err: &io::Error, delay: Duration| {
            warn!(path = %path.display(), error = %err, delay = ?delay, "transient storage failure, retrying");
        })
        .await
        .map_err(|err| {
            if is_transient(&err) {
                StorageError::RetriesExhausted {
                    path: path.display().to_string(),
                    attempts: policy.max_attempts,
                    message: err.to_string(),
                }
            } else {
                StorageError::Io {
                    operation: "write",
                    path: path.display().to_string(),
                    message: err.to_string(),
                }
            }
        })
}

fn read_if_exists(path: &Path) -> io::Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

fn parent_dir(path: &Path) -> &Path {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

/// Replace `path` with `bytes` in one atomic step
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let staged = stage(path, bytes)?;
    commit(staged, path)
}

/// Write `bytes` to a durable temp file next to `path`
///
/// Dropping the returned file without committing removes it.
pub(crate) fn stage(path: &Path, bytes: &[u8]) -> io::Result<NamedTempFile> {
    let dir = parent_dir(path);
    fs::create_dir_all(dir)?;

    let prefix = format!(
        ".{}.",
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "collection".to_string())
    );
    let mut staged = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(dir)?;

    staged.write_all(bytes)?;
    staged.flush()?;
    staged.as_file().sync_all()?;
    Ok(staged)
}

/// Atomically rename a staged file onto `path`
pub(crate) fn commit(staged: NamedTempFile, path: &Path) -> io::Result<()> {
    // on failure the PersistError still owns the temp file and deletes it on drop
    staged.persist(path).map_err(|e| e.error)?;

    #[cfg(unix)]
    if let Ok(dir) = fs::File::open(parent_dir(path)) {
        let _ = dir.sync_all();
    }

    Ok(())
}
