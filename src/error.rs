use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Request to {endpoint} failed: {source}")]
    Upstream {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Backend returned {status} for {endpoint}")]
    UpstreamStatus {
        endpoint: String,
        status: u16,
        /// The `error` field of the response body, when the backend sent one.
        detail: Option<String>,
    },

    #[error("Malformed response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Transport failures and non-2xx responses, the two error kinds a
    /// degraded branch or a retry cares about.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream { .. } | Self::UpstreamStatus { .. })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Upstream { .. } => {
                tracing::warn!("Upstream error: {}", self);
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            AppError::UpstreamStatus { detail, .. } => {
                tracing::warn!("Upstream error: {}", self);
                let message = match detail {
                    Some(detail) => format!("{}: {}", self, detail),
                    None => self.to_string(),
                };
                (StatusCode::BAD_GATEWAY, message)
            }
            AppError::Decode { .. } => {
                tracing::warn!("Decode error: {}", self);
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            AppError::Csv(e) => {
                tracing::error!("CSV error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "CSV error".to_string())
            }
            AppError::Io(e) => {
                tracing::error!("IO error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "IO error".to_string())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
