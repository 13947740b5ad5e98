//! Submission extractor.
//!
//! The HTML form posts `application/x-www-form-urlencoded`; scripted
//! clients post JSON. Both decode into the same `Submission`, and the
//! content type decides how the response is rendered.

use axum::async_trait;
use axum::extract::{Form, FromRequest, Request};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::Response;
use axum::Json;

use super::response::ResponseFormat;
use crate::domain::feedback::Submission;

/// A decoded submission plus the format its reply should use.
#[derive(Debug)]
pub struct SubmissionRequest {
    pub submission: Submission,
    pub format: ResponseFormat,
}

#[async_trait]
impl<S> FromRequest<S> for SubmissionRequest
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let media_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim().to_ascii_lowercase())
            .unwrap_or_default();

        match media_type.as_str() {
            "application/json" => {
                let format = ResponseFormat::Json;
                let Json(submission) = Json::<Submission>::from_request(req, state)
                    .await
                    .map_err(|e| format.error(StatusCode::BAD_REQUEST, &e.body_text(), None))?;
                Ok(Self { submission, format })
            }
            "application/x-www-form-urlencoded" => {
                let format = ResponseFormat::Html;
                let Form(submission) = Form::<Submission>::from_request(req, state)
                    .await
                    .map_err(|e| format.error(StatusCode::BAD_REQUEST, &e.body_text(), None))?;
                Ok(Self { submission, format })
            }
            _ => Err(ResponseFormat::Json.error(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "expected a form or JSON body",
                None,
            )),
        }
    }
}
