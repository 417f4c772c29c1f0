use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::Error;

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingParam(_) | Error::InvalidParam(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Internal(_)
            | Error::Config(_)
            | Error::Database(_)
            | Error::Decode(_)
            | Error::GeneratedKey(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Renders `{"code", "message", "trace_id"}`. Causes of server-side errors
/// stay in the log, the client only sees the error kind.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let trace_id = crate::observability::get_trace_id_string();
        let message = if self.is_client_error() {
            tracing::warn!(error = %self, "request rejected");
            self.to_string()
        } else {
            tracing::error!(error = ?self, "request failed");
            status
                .canonical_reason()
                .unwrap_or("internal server error")
                .to_lowercase()
        };

        let body = serde_json::json!({
            "code": self.code(),
            "message": message,
            "trace_id": trace_id,
        });
        (status, Json(body)).into_response()
    }
}
