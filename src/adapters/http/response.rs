//! Response rendering for form and JSON callers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::domain::feedback::Confirmation;
use crate::domain::validation::Field;

/// Shown for any storage failure. Internal detail stays in the logs.
pub const STORAGE_FAILURE_MESSAGE: &str = "Error saving feedback. Try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Html,
    Json,
}

impl ResponseFormat {
    pub fn confirmation(self, confirmation: &Confirmation) -> Response {
        match self {
            Self::Html => axum::response::Html(format!(
                "<h2>Thank you, {}!</h2>\n\
                 <p>Your feedback has been recorded successfully.</p>\n\
                 <a href=\"/\">Go back</a>\n",
                escape_html(&confirmation.name)
            ))
            .into_response(),
            Self::Json => axum::Json(json!({
                "message": confirmation.message(),
                "name": confirmation.name,
                "total": confirmation.total_records,
            }))
            .into_response(),
        }
    }

    pub fn error(self, status: StatusCode, message: &str, field: Option<Field>) -> Response {
        match self {
            Self::Html => {
                let heading = if status.is_server_error() {
                    escape_html(message)
                } else {
                    format!("Error: {}", escape_html(message))
                };
                (status, axum::response::Html(format!("<h2>{heading}</h2>\n"))).into_response()
            }
            Self::Json => {
                let mut body = json!({ "error": message });
                if let Some(field) = field {
                    body["field"] = json!(field);
                }
                (status, axum::Json(body)).into_response()
            }
        }
    }
}

/// Escape text for inclusion in HTML element content or attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<script>alert('x & y')</script>"),
            "&lt;script&gt;alert(&#39;x &amp; y&#39;)&lt;/script&gt;"
        );
        assert_eq!(escape_html("Alice"), "Alice");
    }

    #[test]
    fn test_error_status_preserved() {
        let resp = ResponseFormat::Html.error(StatusCode::BAD_REQUEST, "name required", None);
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = ResponseFormat::Json.error(StatusCode::INTERNAL_SERVER_ERROR, STORAGE_FAILURE_MESSAGE, None);
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
