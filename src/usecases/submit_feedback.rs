//! Submit Feedback - Validate, Stamp, Persist, Confirm
//!
//! Validation runs first and never touches storage. A valid submission
//! is stamped with the current instant and appended through the
//! repository port. Nothing is retried here; retry policy belongs to
//! the caller.

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::adapters::metrics::{FeedbackMetrics, SubmissionOutcome};
use crate::domain::feedback::{self, Confirmation, Submission};
use crate::domain::validation::{RuleSet, ValidationError};
use crate::ports::repository::{FeedbackRepository, StoreError};

/// Why a submission was not recorded.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Client error: a required field is missing or a rule failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Server error: the log could not be read or written.
    #[error("feedback could not be stored: {0}")]
    Storage(#[from] StoreError),
}

/// Accepts submissions on behalf of the HTTP layer.
pub struct FeedbackService<R: FeedbackRepository + ?Sized> {
    repository: Arc<R>,
    rules: RuleSet,
    metrics: Option<Arc<FeedbackMetrics>>,
}

impl<R: FeedbackRepository + ?Sized> FeedbackService<R> {
    pub fn new(repository: Arc<R>, rules: RuleSet) -> Self {
        Self {
            repository,
            rules,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<FeedbackMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Validate `submission` and append it to the feedback log.
    #[instrument(skip(self, submission), fields(request_id = %Uuid::new_v4()))]
    pub async fn submit(&self, submission: Submission) -> Result<Confirmation, SubmitError> {
        let validated = match self.rules.validate(&submission) {
            Ok(validated) => validated,
            Err(e) => {
                debug!(field = %e.field, reason = %e, "Submission rejected");
                self.record(SubmissionOutcome::Invalid);
                return Err(e.into());
            }
        };

        let name = validated.name().to_string();
        let record = validated.into_record(feedback::now());

        let started = Instant::now();
        let total_records = match self.repository.append(record).await {
            Ok(total) => total,
            Err(e) => {
                error!(error = %e, "Failed to persist feedback");
                self.record(SubmissionOutcome::StorageError);
                return Err(e.into());
            }
        };

        if let Some(metrics) = &self.metrics {
            metrics.observe_write(started.elapsed(), total_records);
        }
        self.record(SubmissionOutcome::Accepted);

        info!(name = %name, records = total_records, "Feedback recorded");

        Ok(Confirmation {
            name,
            total_records,
        })
    }

    fn record(&self, outcome: SubmissionOutcome) {
        if let Some(metrics) = &self.metrics {
            metrics.record_outcome(outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::feedback::{FeedbackLog, FeedbackRecord};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// In-memory repository that can be told to fail writes.
    #[derive(Default)]
    struct MemoryRepo {
        entries: Mutex<FeedbackLog>,
        fail_writes: bool,
    }

    #[async_trait]
    impl FeedbackRepository for MemoryRepo {
        async fn load(&self) -> Result<FeedbackLog, StoreError> {
            Ok(self.entries.lock().unwrap().clone())
        }

        async fn append(&self, record: FeedbackRecord) -> Result<usize, StoreError> {
            if self.fail_writes {
                return Err(StoreError::Io {
                    action: "write",
                    path: "feedback.json".into(),
                    source: std::io::Error::other("disk full"),
                });
            }
            let mut entries = self.entries.lock().unwrap();
            entries.push(record);
            Ok(entries.len())
        }

        async fn is_healthy(&self) -> bool {
            !self.fail_writes
        }
    }

    #[tokio::test]
    async fn test_valid_submission_is_stored() {
        let repo = Arc::new(MemoryRepo::default());
        let metrics = Arc::new(FeedbackMetrics::new().unwrap());
        let service =
            FeedbackService::new(Arc::clone(&repo), RuleSet::default()).with_metrics(Arc::clone(&metrics));

        let before = chrono::Utc::now();
        let confirmation = service
            .submit(Submission::new("Alice", "5", Some("Great chair")))
            .await
            .unwrap();
        let after = chrono::Utc::now();

        assert_eq!(confirmation.message(), "Thank you, Alice!");
        assert_eq!(confirmation.total_records, 1);

        let log = repo.load().await.unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].comments, "Great chair");
        // Stored at millisecond precision, so compare against the truncated window.
        assert!(log[0].submitted_at >= before - chrono::Duration::milliseconds(1));
        assert!(log[0].submitted_at <= after);
        assert_eq!(metrics.log_records.get(), 1);
    }

    #[tokio::test]
    async fn test_invalid_submission_never_writes() {
        let repo = Arc::new(MemoryRepo::default());
        let service = FeedbackService::new(Arc::clone(&repo), RuleSet::default());

        let err = service.submit(Submission::new("", "5", None)).await.unwrap_err();
        assert!(matches!(err, SubmitError::Validation(_)));
        assert_eq!(err.to_string(), "name required");
        assert!(repo.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_storage_failure_is_reported() {
        let repo = Arc::new(MemoryRepo {
            fail_writes: true,
            ..MemoryRepo::default()
        });
        let metrics = Arc::new(FeedbackMetrics::new().unwrap());
        let service =
            FeedbackService::new(repo, RuleSet::default()).with_metrics(Arc::clone(&metrics));

        let err = service.submit(Submission::new("Alice", "5", None)).await.unwrap_err();
        assert!(matches!(err, SubmitError::Storage(_)));
        assert_eq!(
            metrics
                .submissions
                .with_label_values(&[SubmissionOutcome::StorageError.as_str()])
                .get(),
            1
        );
    }
}
