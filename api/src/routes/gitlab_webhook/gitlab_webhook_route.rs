use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use gitlab_client::SourceControl;
use mr_assigner::parse_merge_request_hook;
use tracing::{Instrument, debug, info, info_span, instrument};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::{AppError, AppResult},
    middleware_layer::request_id::REQUEST_ID_HEADER,
    routes::gitlab_webhook::gitlab_webhook_response::GitLabWebhookResponse,
};

const EVENT_HEADER: &str = "X-Gitlab-Event";
const TOKEN_HEADER: &str = "X-Gitlab-Token";
const MERGE_REQUEST_HOOK: &str = "Merge Request Hook";

/// POST /gitlab/callback
///
/// Accepts GitLab merge request hooks. Other event kinds get `204` and are
/// not read. The event is handed to the dispatcher on a background task, so
/// the `200` goes out before any GitLab or chat call is made.
#[instrument(name = "gitlab_webhook_route", skip_all)]
pub async fn gitlab_webhook_route<S>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Response>
where
    S: SourceControl + 'static,
{
    let request_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default()
        .to_string();
    debug!(%request_id, "request id attached");

    // --- Validate shared secret -------------------------------------------------
    if let Some(expected) = state.webhook_secret.as_deref() {
        let provided = headers
            .get(TOKEN_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .unwrap_or_default();
        if provided != expected.trim() {
            return Err(AppError::Unauthorized);
        }
    }

    // --- Filter event kind ------------------------------------------------------
    let kind = headers
        .get(EVENT_HEADER)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default();
    if kind != MERGE_REQUEST_HOOK {
        debug!(%kind, "not a merge request hook, ignoring");
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let event = parse_merge_request_hook(&body)?;

    info!(
        project = event.project_id,
        iid = event.iid,
        action = %event.raw_action,
        "merge request event accepted"
    );

    // --- Hand off ---------------------------------------------------------------
    let dispatcher = state.dispatcher.clone();
    let span = info_span!("mr_event", %request_id, project = event.project_id, iid = event.iid);
    let message = format!(
        "Merge request !{} of project {} accepted ({}).",
        event.iid, event.project_id, event.raw_action
    );
    tokio::spawn(
        async move {
            let outcome = dispatcher.dispatch(&event).await;
            debug!(?outcome, "dispatch finished");
        }
        .instrument(span),
    );

    Ok(ApiResponse::success(GitLabWebhookResponse { message })
        .into_response_with_status(StatusCode::OK))
}
