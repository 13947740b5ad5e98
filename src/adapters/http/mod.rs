//! HTTP Adapter - axum Router for the Feedback Endpoint
//!
//! Routes:
//! - `POST /submit-feedback`, `POST /api/feedback`: record a submission
//! - `GET /api/feedback/rules`: validation rules for the client form
//! - `GET /live`, `GET /ready`: probes
//! - `GET /metrics`: Prometheus text (when enabled)

pub mod extract;
pub mod response;
pub mod routes;

use std::future::Future;
use std::num::NonZeroU32;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use tokio::net::TcpListener;
use tracing::info;

use crate::adapters::metrics::{health, FeedbackMetrics, HealthState};
use crate::config::RateLimitConfig;
use crate::ports::repository::FeedbackRepository;
use crate::usecases::FeedbackService;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<FeedbackService<dyn FeedbackRepository>>,
    pub health: HealthState,
    pub metrics: Option<Arc<FeedbackMetrics>>,
    pub limiter: Arc<DefaultDirectRateLimiter>,
}

impl AppState {
    pub fn new(
        service: Arc<FeedbackService<dyn FeedbackRepository>>,
        health: HealthState,
        metrics: Option<Arc<FeedbackMetrics>>,
        rate_limit: &RateLimitConfig,
    ) -> Self {
        let per_second = NonZeroU32::new(rate_limit.submissions_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(rate_limit.burst).unwrap_or(per_second);
        let quota = Quota::per_second(per_second).allow_burst(burst);

        Self {
            service,
            health,
            metrics,
            limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }
}

/// Build the service router.
pub fn router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/submit-feedback", post(routes::submit_feedback))
        .route("/api/feedback", post(routes::submit_feedback))
        .route("/api/feedback/rules", get(routes::validation_rules))
        .route("/live", get(health::liveness))
        .route("/ready", get(health::readiness));

    if state.metrics.is_some() {
        router = router.route("/metrics", get(routes::metrics));
    }

    router.with_state(state)
}

/// Serve until `shutdown` resolves, then drain in-flight requests.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let address = listener.local_addr()?;
    info!(address = %address, "Feedback endpoint listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
