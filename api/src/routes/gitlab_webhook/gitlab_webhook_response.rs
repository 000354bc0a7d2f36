use serde::Serialize;

/// Response body returned once a merge request event has been accepted.
#[derive(Debug, Serialize)]
pub struct GitLabWebhookResponse {
    /// Human-readable message describing what happened.
    pub message: String,
}
