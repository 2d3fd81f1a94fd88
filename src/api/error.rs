use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::error::Error;

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound(_) | Error::SourceNotFound { .. } => StatusCode::NOT_FOUND,
            Error::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            Error::CatalogUnavailable { .. } => StatusCode::BAD_GATEWAY,
            Error::PersistenceFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::PartialPropagationFailure { .. } => StatusCode::MULTI_STATUS,
        }
    }
}

/// Errors render as `{"error": CODE, "message": text}`
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let mut body = json!({
            "error": self.code(),
            "message": self.to_string(),
        });
        if let Error::PartialPropagationFailure { attempted, failed } = &self {
            body["attempted"] = json!(attempted);
            body["failed"] = json!(failed);
        }

        (status, Json(body)).into_response()
    }
}
