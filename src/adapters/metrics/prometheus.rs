//! Prometheus Metrics Registry - Submission Observability
//!
//! Counts submissions by outcome, times log writes, and tracks the log
//! size. Exposed as Prometheus text on `/metrics` by the HTTP router.

use std::time::Duration;

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

/// How a submission ended, used as the `outcome` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Accepted,
    Invalid,
    StorageError,
    RateLimited,
}

impl SubmissionOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Invalid => "invalid",
            Self::StorageError => "storage_error",
            Self::RateLimited => "rate_limited",
        }
    }
}

/// Centralized Prometheus metrics for the feedback store.
///
/// All metrics follow the naming convention `feedback_*`.
pub struct FeedbackMetrics {
    /// Prometheus registry.
    registry: Registry,
    /// Submissions by outcome.
    pub submissions: IntCounterVec,
    /// Time spent in one load-append-store cycle (seconds).
    pub write_seconds: Histogram,
    /// Records in the log after the last successful write.
    pub log_records: IntGauge,
    /// Malformed stored logs encountered.
    pub corrupt_logs: IntCounter,
}

impl FeedbackMetrics {
    /// Create and register all Prometheus metrics.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let submissions = IntCounterVec::new(
            Opts::new("feedback_submissions_total", "Feedback submissions by outcome"),
            &["outcome"],
        )?;

        let write_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "feedback_store_write_seconds",
                "Latency of one feedback log append",
            )
            .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]),
        )?;

        let log_records = IntGauge::new(
            "feedback_log_records",
            "Records in the feedback log after the last write",
        )?;

        let corrupt_logs = IntCounter::new(
            "feedback_corrupt_logs_total",
            "Malformed feedback logs encountered on load",
        )?;

        // Register all metrics
        registry.register(Box::new(submissions.clone()))?;
        registry.register(Box::new(write_seconds.clone()))?;
        registry.register(Box::new(log_records.clone()))?;
        registry.register(Box::new(corrupt_logs.clone()))?;

        Ok(Self {
            registry,
            submissions,
            write_seconds,
            log_records,
            corrupt_logs,
        })
    }

    pub fn record_outcome(&self, outcome: SubmissionOutcome) {
        self.submissions.with_label_values(&[outcome.as_str()]).inc();
    }

    pub fn observe_write(&self, elapsed: Duration, records: usize) {
        self.write_seconds.observe(elapsed.as_secs_f64());
        self.log_records.set(i64::try_from(records).unwrap_or(i64::MAX));
    }

    pub fn record_corrupt_log(&self) {
        self.corrupt_logs.inc();
    }

    /// Encode every registered metric in Prometheus text format.
    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_includes_outcomes() {
        let metrics = FeedbackMetrics::new().unwrap();
        metrics.record_outcome(SubmissionOutcome::Accepted);
        metrics.record_outcome(SubmissionOutcome::Accepted);
        metrics.record_outcome(SubmissionOutcome::Invalid);
        metrics.observe_write(Duration::from_millis(2), 7);

        let text = metrics.render().unwrap();
        assert!(text.contains("feedback_submissions_total{outcome=\"accepted\"} 2"));
        assert!(text.contains("feedback_submissions_total{outcome=\"invalid\"} 1"));
        assert!(text.contains("feedback_log_records 7"));
    }

    #[test]
    fn test_corrupt_counter() {
        let metrics = FeedbackMetrics::new().unwrap();
        metrics.record_corrupt_log();
        assert_eq!(metrics.corrupt_logs.get(), 1);
    }
}
