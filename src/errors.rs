use axum::http::StatusCode;
use std::path::PathBuf;

/// Failures that abort startup before the listener binds.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid link file: {0}")]
    LinksJson(#[from] serde_json::Error),
    #[error("link file must be a JSON object of label to url")]
    LinksNotObject,
    #[error("link {0:?} must map to a string url")]
    LinkNotString(String),
    #[error("failed to scan data directory: {0}")]
    Scan(#[source] std::io::Error),
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
