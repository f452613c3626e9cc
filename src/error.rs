use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::domain::BackendError;

const REDIRECT_ERROR_MESSAGE: &str = "Error processing redirect";

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request rejected before any backend call.
    #[error("{message}")]
    Validation { message: String },

    /// Backend confirmed the short code does not exist.
    #[error("{message}")]
    NotFound { message: String },

    /// Backend answered with a status that is neither a usable redirect nor 404.
    #[error("backend returned {status}")]
    Upstream { status: StatusCode },

    /// The backend call itself failed.
    #[error("backend request failed: {error}")]
    Transport { error: String },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }
    pub fn upstream(status: StatusCode) -> Self {
        Self::Upstream { status }
    }
    pub fn transport(error: impl Into<String>) -> Self {
        Self::Transport {
            error: error.into(),
        }
    }

    /// HTTP status returned to the client.
    ///
    /// Upstream statuses pass through unchanged, including 2xx and a 3xx
    /// that carried no `Location`.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Upstream { status } => *status,
            AppError::Transport { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label used for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "validation_error",
            AppError::NotFound { .. } => "not_found",
            AppError::Upstream { .. } => "upstream_error",
            AppError::Transport { .. } => "transport_error",
        }
    }
}

impl From<BackendError> for AppError {
    fn from(e: BackendError) -> Self {
        AppError::transport(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            AppError::Validation { message } | AppError::NotFound { message } => ErrorBody {
                message,
                error: None,
            },
            AppError::Upstream { .. } => ErrorBody {
                message: REDIRECT_ERROR_MESSAGE.to_string(),
                error: None,
            },
            AppError::Transport { error } => ErrorBody {
                message: REDIRECT_ERROR_MESSAGE.to_string(),
                error: Some(error),
            },
        };

        (status, Json(body)).into_response()
    }
}
