//! Health Checks - Liveness and Readiness Probes
//!
//! `/live` answers 200 while the process runs. `/ready` answers 200 only
//! while the service is accepting submissions and the feedback store
//! reports itself writable; it flips to 503 as soon as shutdown begins.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::AppState;

/// Shared readiness flag, cleared during graceful shutdown.
#[derive(Debug, Clone)]
pub struct HealthState {
    accepting: Arc<AtomicBool>,
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthState {
    /// Create a new health state (accepting by default).
    pub fn new() -> Self {
        Self {
            accepting: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_accepting(&self) -> bool {
        self.accepting.load(Ordering::Relaxed)
    }

    /// Stop reporting ready. Called once shutdown starts.
    pub fn mark_draining(&self) {
        self.accepting.store(false, Ordering::Relaxed);
    }
}

/// Liveness probe: always returns 200 if the process is running.
pub async fn liveness() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Readiness probe: 200 only while accepting and the store is writable.
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    if state.health.is_accepting() && state.service.repository().is_healthy().await {
        (StatusCode::OK, "READY")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "NOT READY")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draining_clears_flag_for_all_clones() {
        let health = HealthState::new();
        let shared = health.clone();
        assert!(shared.is_accepting());
        health.mark_draining();
        assert!(!shared.is_accepting());
    }
}
