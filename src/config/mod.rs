//! Configuration Module - TOML-based Service Configuration
//!
//! Loads and validates configuration from `config.toml`. Every section
//! has serde defaults, so an empty file yields a runnable service that
//! listens on :3000 and writes `data/feedback.json`.

pub mod loader;

use serde::Deserialize;

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
  /// HTTP listener and logging.
  #[serde(default)]
  pub server: ServerConfig,
  /// Feedback log location and failure handling.
  #[serde(default)]
  pub storage: StorageConfig,
  /// Optional submission rules beyond the required fields.
  #[serde(default)]
  pub validation: ValidationConfig,
  /// Submission rate limiting.
  #[serde(default)]
  pub rate_limit: RateLimitConfig,
  /// Prometheus export.
  #[serde(default)]
  pub metrics: MetricsConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  /// Service name reported in startup logs.
  #[serde(default = "default_name")]
  pub name: String,
  /// Socket address to bind.
  #[serde(default = "default_bind_address")]
  pub bind_address: String,
  /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins.
  #[serde(default = "default_log_level")]
  pub log_level: String,
  /// Emit JSON log lines instead of human-readable ones.
  #[serde(default = "default_true")]
  pub json_logs: bool,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      name: default_name(),
      bind_address: default_bind_address(),
      log_level: default_log_level(),
      json_logs: true,
    }
  }
}

/// What to do when the stored log exists but does not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorruptLogPolicy {
  /// Rename the unreadable file aside and continue with an empty log.
  #[default]
  Quarantine,
  /// Fail the request and leave the file untouched.
  Reject,
  /// Log the error and overwrite with a fresh log.
  Reset,
}

/// Feedback log persistence configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
  /// Path of the JSON feedback log.
  #[serde(default = "default_log_path")]
  pub log_path: String,
  /// Upper bound on one load or append, lock wait included (ms).
  #[serde(default = "default_io_timeout")]
  pub io_timeout_ms: u64,
  /// Handling of a malformed stored log.
  #[serde(default)]
  pub on_corrupt: CorruptLogPolicy,
}

impl Default for StorageConfig {
  fn default() -> Self {
    Self {
      log_path: default_log_path(),
      io_timeout_ms: default_io_timeout(),
      on_corrupt: CorruptLogPolicy::default(),
    }
  }
}

/// Submission rules beyond `name` and `rating`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidationConfig {
  /// Minimum length of non-empty comments (0 disables the check).
  #[serde(default)]
  pub min_comment_length: usize,
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
  /// Sustained submissions per second across all clients.
  #[serde(default = "default_submissions_per_second")]
  pub submissions_per_second: u32,
  /// Burst allowance above the sustained rate.
  #[serde(default = "default_burst")]
  pub burst: u32,
}

impl Default for RateLimitConfig {
  fn default() -> Self {
    Self {
      submissions_per_second: default_submissions_per_second(),
      burst: default_burst(),
    }
  }
}

/// Metrics configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
  /// Serve `/metrics` in Prometheus text format.
  #[serde(default = "default_true")]
  pub enabled: bool,
}

impl Default for MetricsConfig {
  fn default() -> Self {
    Self { enabled: true }
  }
}

// Default value functions for serde

fn default_name() -> String {
  "feedback-store".to_string()
}

fn default_bind_address() -> String {
  "0.0.0.0:3000".to_string()
}

fn default_log_level() -> String {
  "info".to_string()
}

fn default_true() -> bool {
  true
}

fn default_log_path() -> String {
  "data/feedback.json".to_string()
}

fn default_io_timeout() -> u64 {
  5_000
}

fn default_submissions_per_second() -> u32 {
  20
}

fn default_burst() -> u32 {
  40
}
