use crate::error::Error;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

/// JSON error reply: `{ "error": "<message>" }`.
#[derive(Debug)]
pub(super) struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub(super) fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub(super) fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    /// Body that never reached the handler: wrong content type, invalid JSON,
    /// or fields of the wrong type. Keeps axum's status code.
    pub(super) fn from_rejection(rejection: &JsonRejection) -> Self {
        tracing::debug!(
            status = %rejection.status(),
            reason = %rejection.body_text(),
            "request body rejected"
        );
        Self {
            status: rejection.status(),
            message: format!("Ungültige Anfrage: {}", rejection.body_text()),
        }
    }

    /// Classify a crate error.
    ///
    /// Client mistakes keep their message. Server-side failures are logged
    /// with their cause and the client only sees `public_message`.
    pub(super) fn from_error(error: Error, public_message: &str) -> Self {
        match error {
            Error::InvalidInput(message) => Self::bad_request(message),
            Error::NotConfigured(what) => {
                tracing::warn!(missing = what, "request rejected, not configured");
                Self::internal(format!("{what} nicht konfiguriert"))
            }
            other => {
                tracing::error!(error = %other, "{public_message}");
                Self::internal(public_message)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}
