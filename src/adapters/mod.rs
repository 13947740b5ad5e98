//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! infrastructure, and exposes the use cases over HTTP.
//!
//! Adapter categories:
//! - `http`: axum router, submission extractor, response rendering
//! - `metrics`: Prometheus metrics and health probes
//! - `persistence`: JSON file feedback log

pub mod http;
pub mod metrics;
pub mod persistence;
