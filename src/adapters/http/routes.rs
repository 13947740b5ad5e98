//! Route handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, warn};

use super::AppState;
use super::extract::SubmissionRequest;
use super::response::STORAGE_FAILURE_MESSAGE;
use crate::adapters::metrics::SubmissionOutcome;
use crate::domain::validation::RuleSet;
use crate::usecases::SubmitError;

/// `POST /submit-feedback` and `POST /api/feedback`.
pub async fn submit_feedback(
    State(state): State<AppState>,
    SubmissionRequest { submission, format }: SubmissionRequest,
) -> Response {
    if state.limiter.check().is_err() {
        warn!("Submission rate limit exceeded");
        if let Some(metrics) = &state.metrics {
            metrics.record_outcome(SubmissionOutcome::RateLimited);
        }
        return format.error(
            StatusCode::TOO_MANY_REQUESTS,
            "Too many submissions. Try again later.",
            None,
        );
    }

    match state.service.submit(submission).await {
        Ok(confirmation) => format.confirmation(&confirmation),
        Err(SubmitError::Validation(e)) => {
            format.error(StatusCode::BAD_REQUEST, &e.message, Some(e.field))
        }
        Err(SubmitError::Storage(_)) => format.error(
            StatusCode::INTERNAL_SERVER_ERROR,
            STORAGE_FAILURE_MESSAGE,
            None,
        ),
    }
}

/// `GET /api/feedback/rules`: the rule set the form should mirror.
pub async fn validation_rules(State(state): State<AppState>) -> Json<RuleSet> {
    Json(state.service.rules().clone())
}

/// `GET /metrics`: Prometheus text exposition.
pub async fn metrics(State(state): State<AppState>) -> Response {
    let Some(metrics) = &state.metrics else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match metrics.render() {
        Ok(text) => ([(CONTENT_TYPE, "text/plain; version=0.0.4")], text).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
