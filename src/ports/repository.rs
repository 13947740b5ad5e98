//! Repository Port - Feedback Log Persistence Interface
//!
//! The use-case layer only sees this trait. Implementations own the
//! log exclusively and must linearize every load-mutate-store sequence,
//! so two concurrent `append` calls can never lose a record.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::feedback::{FeedbackLog, FeedbackRecord};

/// Failures surfaced by a feedback repository.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored document exists but is not a valid feedback log.
    #[error("feedback log {} is malformed: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize feedback log: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("feedback log operation exceeded {0:?}")]
    Timeout(Duration),

    #[error("feedback log task aborted: {0}")]
    Interrupted(String),
}

/// Exclusive owner of the persisted feedback log.
#[async_trait]
pub trait FeedbackRepository: Send + Sync + 'static {
    /// Read the whole log in insertion order.
    async fn load(&self) -> Result<FeedbackLog, StoreError>;

    /// Append one record and persist the log. Returns the new log length.
    async fn append(&self, record: FeedbackRecord) -> Result<usize, StoreError>;

    /// Whether the backing storage is currently writable.
    async fn is_healthy(&self) -> bool;
}
