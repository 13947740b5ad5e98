//! Metrics and Monitoring Adapters
//!
//! Prometheus counters for submissions and store writes, plus the
//! liveness/readiness probes served by the main router.

pub mod health;
pub mod prometheus;

pub use health::HealthState;
pub use prometheus::{FeedbackMetrics, SubmissionOutcome};
