//! JSON File Store - Single-Document Feedback Log
//!
//! The whole log lives in one pretty-printed JSON array. Every
//! load-append-store cycle runs under one async mutex, so concurrent
//! submissions are linearized instead of racing on the file.
//!
//! Writes go to `<log>.tmp` and are renamed over the log, so the file on
//! disk is always either the previous or the next valid document.
//!
//! Each cycle runs on its own task. A caller that times out stops waiting,
//! but the task keeps the lock until its I/O finishes, so a late write can
//! never interleave with the next one.

use std::ffi::OsString;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::adapters::metrics::FeedbackMetrics;
use crate::config::{CorruptLogPolicy, StorageConfig};
use crate::domain::feedback::{FeedbackLog, FeedbackRecord};
use crate::ports::repository::{FeedbackRepository, StoreError};

/// File-backed `FeedbackRepository`.
pub struct JsonFileStore {
    inner: Arc<LogFile>,
    /// Bound on one operation, lock wait included.
    io_timeout: Duration,
}

struct LogFile {
    path: PathBuf,
    tmp_path: PathBuf,
    on_corrupt: CorruptLogPolicy,
    lock: Mutex<()>,
    metrics: Option<Arc<FeedbackMetrics>>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>, on_corrupt: CorruptLogPolicy, io_timeout: Duration) -> Self {
        Self::build(path.into(), on_corrupt, io_timeout, None)
    }

    fn build(
        path: PathBuf,
        on_corrupt: CorruptLogPolicy,
        io_timeout: Duration,
        metrics: Option<Arc<FeedbackMetrics>>,
    ) -> Self {
        let tmp_path = sibling(&path, ".tmp");

        Self {
            inner: Arc::new(LogFile {
                path,
                tmp_path,
                on_corrupt,
                lock: Mutex::new(()),
                metrics,
            }),
            io_timeout,
        }
    }

    /// Build a store from configuration, creating the log's directory.
    /// Corrupt logs are counted in `metrics` when given.
    pub async fn open(
        config: &StorageConfig,
        metrics: Option<Arc<FeedbackMetrics>>,
    ) -> Result<Self, StoreError> {
        let store = Self::build(
            PathBuf::from(&config.log_path),
            config.on_corrupt,
            Duration::from_millis(config.io_timeout_ms),
            metrics,
        );

        let dir = store.inner.dir();
        fs::create_dir_all(&dir).await.map_err(|source| StoreError::Io {
            action: "create directory",
            path: dir.clone(),
            source,
        })?;

        info!(
            path = %store.inner.path.display(),
            on_corrupt = ?config.on_corrupt,
            "Feedback store opened"
        );

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Run `op` on its own task, bounded by the I/O timeout.
    async fn run<T, F, Fut>(&self, op: F) -> Result<T, StoreError>
    where
        F: FnOnce(Arc<LogFile>) -> Fut,
        Fut: Future<Output = Result<T, StoreError>> + Send + 'static,
        T: Send + 'static,
    {
        let task = tokio::spawn(op(Arc::clone(&self.inner)));

        match tokio::time::timeout(self.io_timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join)) => Err(StoreError::Interrupted(join.to_string())),
            Err(_) => {
                warn!(
                    path = %self.inner.path.display(),
                    timeout_ms = self.io_timeout.as_millis() as u64,
                    "Feedback log operation timed out"
                );
                Err(StoreError::Timeout(self.io_timeout))
            }
        }
    }
}

#[async_trait]
impl FeedbackRepository for JsonFileStore {
    async fn load(&self) -> Result<FeedbackLog, StoreError> {
        self.run(|log| async move { log.load().await }).await
    }

    async fn append(&self, record: FeedbackRecord) -> Result<usize, StoreError> {
        self.run(move |log| async move { log.append(record).await }).await
    }

    /// Check that the log's directory accepts writes.
    async fn is_healthy(&self) -> bool {
        // Unique per call so overlapping checks never remove each other's file.
        let marker = self.inner.dir().join(format!(".feedback-health-{}", Uuid::new_v4()));
        let result = fs::write(&marker, b"ok").await;
        let _ = fs::remove_file(&marker).await;
        result.is_ok()
    }
}

impl LogFile {
    fn dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    async fn load(&self) -> Result<FeedbackLog, StoreError> {
        let _guard = self.lock.lock().await;
        self.read().await
    }

    #[instrument(skip(self, record), fields(path = %self.path.display()))]
    async fn append(&self, record: FeedbackRecord) -> Result<usize, StoreError> {
        let _guard = self.lock.lock().await;

        let mut entries = self.read().await?;
        entries.push(record);
        self.write(&entries).await?;

        debug!(records = entries.len(), "Feedback log written");
        Ok(entries.len())
    }

    async fn read(&self) -> Result<FeedbackLog, StoreError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No feedback log yet, starting empty");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    action: "read",
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        match serde_json::from_slice::<FeedbackLog>(&bytes) {
            Ok(entries) => Ok(entries),
            Err(source) => self.recover(source).await,
        }
    }

    async fn recover(&self, source: serde_json::Error) -> Result<FeedbackLog, StoreError> {
        if let Some(metrics) = &self.metrics {
            metrics.record_corrupt_log();
        }

        match self.on_corrupt {
            CorruptLogPolicy::Reject => {
                error!(
                    path = %self.path.display(),
                    error = %source,
                    "Feedback log is malformed, rejecting write"
                );
                Err(StoreError::Corrupt {
                    path: self.path.clone(),
                    source,
                })
            }
            CorruptLogPolicy::Reset => {
                error!(
                    path = %self.path.display(),
                    error = %source,
                    "Feedback log is malformed, discarding it"
                );
                Ok(Vec::new())
            }
            CorruptLogPolicy::Quarantine => {
                // e.g. feedback.json.corrupt-20260117T093005.123Z
                let stamp = Utc::now().format("%Y%m%dT%H%M%S%.3fZ");
                let target = sibling(&self.path, &format!(".corrupt-{stamp}"));

                fs::rename(&self.path, &target)
                    .await
                    .map_err(|source| StoreError::Io {
                        action: "quarantine",
                        path: self.path.clone(),
                        source,
                    })?;

                warn!(
                    path = %self.path.display(),
                    preserved = %target.display(),
                    error = %source,
                    "Feedback log is malformed, moved aside and starting empty"
                );
                Ok(Vec::new())
            }
        }
    }

    /// Serialize `entries` and atomically replace the log (tmp → rename).
    async fn write(&self, entries: &FeedbackLog) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(entries).map_err(StoreError::Serialize)?;

        if let Err(source) = write_synced(&self.tmp_path, &json).await {
            let _ = fs::remove_file(&self.tmp_path).await;
            return Err(StoreError::Io {
                action: "write",
                path: self.tmp_path.clone(),
                source,
            });
        }

        fs::rename(&self.tmp_path, &self.path)
            .await
            .map_err(|source| StoreError::Io {
                action: "replace",
                path: self.path.clone(),
                source,
            })
    }
}

async fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await
}

/// `path` with `suffix` appended to its file name.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
