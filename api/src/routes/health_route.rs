use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Response};
use gitlab_client::SourceControl;
use serde::Serialize;

use crate::core::{app_state::AppState, http::response_envelope::ApiResponse};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub chat_enabled: bool,
}

/// GET /health
pub async fn health_route<S>(State(state): State<Arc<AppState<S>>>) -> Response
where
    S: SourceControl + 'static,
{
    ApiResponse::success(HealthResponse {
        status: "ok",
        chat_enabled: state.chat_enabled,
    })
    .into_response_with_status(StatusCode::OK)
}
