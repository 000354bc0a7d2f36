use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::core::{
    app_state::ConfigError,
    http::response_envelope::{ApiErrorDetail, ApiResponse, ErrorCode},
};

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Config(#[from] ConfigError),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request ---
    /// Webhook body could not be parsed.
    #[error("bad request: {message}")]
    BadRequest {
        message: String,
        path: Option<String>,
    },

    /// `X-Gitlab-Token` did not match the configured secret.
    #[error("invalid webhook token")]
    Unauthorized,
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            // 4xx
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,

            // 5xx
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR, // startup-only
            AppError::Bind(_) | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> ErrorCode {
        match self {
            AppError::Config(_) => ErrorCode::ConfigError,
            AppError::Bind(_) => ErrorCode::BindError,
            AppError::Server(_) => ErrorCode::ServerError,
            AppError::BadRequest { .. } => ErrorCode::BadRequest,
            AppError::Unauthorized => ErrorCode::Unauthorized,
        }
    }

    fn details(&self) -> Vec<ApiErrorDetail> {
        match self {
            AppError::BadRequest { path, .. } => vec![ApiErrorDetail {
                path: path.clone(),
                hint: Some("Expected a GitLab merge request hook JSON body.".into()),
            }],
            AppError::Unauthorized => vec![ApiErrorDetail {
                path: Some("X-Gitlab-Token".into()),
                hint: Some("Secret token does not match the configured webhook secret.".into()),
            }],
            _ => Vec::new(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        let message = err.to_string();
        // serde_json reports "missing field `iid`" style messages.
        let path = message
            .split('`')
            .nth(1)
            .filter(|_| message.starts_with("missing field"))
            .map(str::to_string);
        AppError::BadRequest { message, path }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        ApiResponse::error(self.error_code(), self.to_string(), self.details())
            .into_response_with_status(status)
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;
