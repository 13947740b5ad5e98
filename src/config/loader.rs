//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig> {
  let path = path.as_ref();

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = parse_config(&content)
    .with_context(|| format!("Invalid config file: {}", path.display()))?;

  info!(
    path = %path.display(),
    bind = %config.server.bind_address,
    log_path = %config.storage.log_path,
    on_corrupt = ?config.storage.on_corrupt,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig = toml::from_str(content).context("Failed to parse TOML")?;
  validate_config(&config)?;
  Ok(config)
}

/// Validate all configuration parameters.
fn validate_config(config: &AppConfig) -> Result<()> {
  config
    .server
    .bind_address
    .parse::<SocketAddr>()
    .with_context(|| format!("bind_address is not a socket address: {}", config.server.bind_address))?;

  anyhow::ensure!(
    !config.storage.log_path.trim().is_empty(),
    "storage.log_path must not be empty"
  );
  anyhow::ensure!(
    config.storage.io_timeout_ms > 0,
    "storage.io_timeout_ms must be positive"
  );

  anyhow::ensure!(
    config.rate_limit.submissions_per_second > 0,
    "rate_limit.submissions_per_second must be positive"
  );
  anyhow::ensure!(
    config.rate_limit.burst >= config.rate_limit.submissions_per_second,
    "rate_limit.burst ({}) must be >= submissions_per_second ({})",
    config.rate_limit.burst,
    config.rate_limit.submissions_per_second
  );

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::CorruptLogPolicy;

  #[test]
  fn test_load_nonexistent_file() {
    let result = load_config("nonexistent.toml");
    assert!(result.is_err());
  }

  #[test]
  fn test_empty_config_uses_defaults() {
    let config = parse_config("").unwrap();
    assert_eq!(config.server.bind_address, "0.0.0.0:3000");
    assert_eq!(config.storage.log_path, "data/feedback.json");
    assert_eq!(config.storage.on_corrupt, CorruptLogPolicy::Quarantine);
    assert_eq!(config.validation.min_comment_length, 0);
    assert!(config.metrics.enabled);
  }

  #[test]
  fn test_corrupt_policy_parses() {
    let config = parse_config("[storage]\non_corrupt = \"reject\"\n").unwrap();
    assert_eq!(config.storage.on_corrupt, CorruptLogPolicy::Reject);

    assert!(parse_config("[storage]\non_corrupt = \"ignore\"\n").is_err());
  }

  #[test]
  fn test_rejects_bad_bind_address() {
    assert!(parse_config("[server]\nbind_address = \"localhost\"\n").is_err());
  }

  #[test]
  fn test_rejects_zero_timeout() {
    assert!(parse_config("[storage]\nio_timeout_ms = 0\n").is_err());
  }

  #[test]
  fn test_rejects_burst_below_rate() {
    let toml = "[rate_limit]\nsubmissions_per_second = 10\nburst = 5\n";
    assert!(parse_config(toml).is_err());
  }

  #[test]
  fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[validation]\nmin_comment_length = 10\n").unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(config.validation.min_comment_length, 10);
  }
}
