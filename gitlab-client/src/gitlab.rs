//! GitLab provider (REST v4) for users, project members and MR assignees.
//!
//! Endpoints used:
//!   * GET /users/:id
//!   * GET /projects/:id/members?page=:page&per_page=:per_page
//!   * PUT /projects/:id/merge_requests/:iid

use std::time::Duration;

use reqwest::{Client, Response};
use serde::Serialize;
use tracing::debug;

use crate::SourceControl;
use crate::errors::{ClientConfigError, GitLabResult, ProviderError};
use crate::types::{Member, User};

/// Runtime configuration for the GitLab client.
#[derive(Debug, Clone)]
pub struct GitLabConfig {
    /// API base, e.g. "https://gitlab.com/api/v4".
    pub base_api: String,
    /// Access token sent as `PRIVATE-TOKEN`.
    pub token: String,
    /// Upper bound for every outbound call.
    pub timeout: Duration,
}

/// GitLab HTTP client wrapper.
#[derive(Debug, Clone)]
pub struct GitLabClient {
    http: Client,
    base_api: String,
    token: String,
}

impl GitLabClient {
    /// Validates the configuration and builds a client with a bounded timeout.
    pub fn from_config(cfg: GitLabConfig) -> GitLabResult<Self> {
        if cfg.token.trim().is_empty() {
            return Err(ClientConfigError::MissingToken.into());
        }
        if !(cfg.base_api.starts_with("http://") || cfg.base_api.starts_with("https://")) {
            return Err(ClientConfigError::InvalidBaseUrl(cfg.base_api).into());
        }

        debug!(
            "Creating GitLabClient with base_api={}, timeout={:?}",
            cfg.base_api, cfg.timeout
        );

        let http = Client::builder()
            .user_agent("mr-maintainer-bot/0.1")
            .timeout(cfg.timeout)
            .build()?;

        Ok(Self {
            http,
            base_api: cfg.base_api.trim_end_matches('/').to_string(),
            token: cfg.token,
        })
    }

    /// API base without a trailing slash.
    pub fn base_api(&self) -> &str {
        &self.base_api
    }

    /// Fetches a single user by id.
    pub async fn get_user(&self, user_id: u64) -> GitLabResult<User> {
        let url = format!("{}/users/{}", self.base_api, user_id);
        debug!("GitLab get_user: {}", url);

        let resp = self
            .http
            .get(url)
            .header("PRIVATE-TOKEN", &self.token)
            .send()
            .await?;

        Ok(check_status(resp)?.json().await?)
    }

    /// Fetches one page of direct project members.
    ///
    /// Inherited (group) members are not included; they live under
    /// `/members/all`. Entries are kept as `Option` so callers can see
    /// `null` holes in a malformed page instead of failing the whole decode.
    pub async fn list_project_members(
        &self,
        project_id: u64,
        page: u32,
        per_page: u32,
    ) -> GitLabResult<Vec<Option<Member>>> {
        let url = format!("{}/projects/{}/members", self.base_api, project_id);
        debug!(
            "GitLab list_project_members: {} page={} per_page={}",
            url, page, per_page
        );

        let resp = self
            .http
            .get(url)
            .query(&[("page", page), ("per_page", per_page)])
            .header("PRIVATE-TOKEN", &self.token)
            .send()
            .await?;

        Ok(check_status(resp)?.json().await?)
    }

    /// Sets the single assignee of a merge request.
    pub async fn update_merge_request_assignee(
        &self,
        project_id: u64,
        iid: u64,
        assignee_id: u64,
    ) -> GitLabResult<()> {
        let url = format!(
            "{}/projects/{}/merge_requests/{}",
            self.base_api, project_id, iid
        );
        debug!("GitLab update_merge_request_assignee: {} -> {}", url, assignee_id);

        let resp = self
            .http
            .put(url)
            .header("PRIVATE-TOKEN", &self.token)
            .json(&AssigneeUpdate { assignee_id })
            .send()
            .await?;

        // The updated merge request in the body is not needed.
        if let Err(err) = check_status(resp)?.bytes().await {
            debug!(error = %err, "assignee update body not read");
        }
        Ok(())
    }
}

impl SourceControl for GitLabClient {
    async fn get_user(&self, user_id: u64) -> GitLabResult<User> {
        GitLabClient::get_user(self, user_id).await
    }

    async fn list_project_members(
        &self,
        project_id: u64,
        page: u32,
        per_page: u32,
    ) -> GitLabResult<Vec<Option<Member>>> {
        GitLabClient::list_project_members(self, project_id, page, per_page).await
    }

    async fn update_merge_request_assignee(
        &self,
        project_id: u64,
        iid: u64,
        assignee_id: u64,
    ) -> GitLabResult<()> {
        GitLabClient::update_merge_request_assignee(self, project_id, iid, assignee_id).await
    }
}

/// Turns a non-2xx response into a [`ProviderError`], keeping `Retry-After`.
fn check_status(resp: Response) -> Result<Response, ProviderError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let retry_after_secs = resp
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok());

    Err(ProviderError::from_status(status, retry_after_secs))
}

#[derive(Debug, Serialize)]
struct AssigneeUpdate {
    assignee_id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::GitLabError;

    fn cfg(base_api: &str, token: &str) -> GitLabConfig {
        GitLabConfig {
            base_api: base_api.to_string(),
            token: token.to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn empty_token_is_rejected() {
        let err = GitLabClient::from_config(cfg("https://gitlab.com/api/v4", "  ")).unwrap_err();
        assert!(matches!(
            err,
            GitLabError::Config(ClientConfigError::MissingToken)
        ));
    }

    #[test]
    fn base_url_needs_http_scheme() {
        let err = GitLabClient::from_config(cfg("gitlab.com/api/v4", "t")).unwrap_err();
        assert!(matches!(
            err,
            GitLabError::Config(ClientConfigError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = GitLabClient::from_config(cfg("https://gitlab.example/api/v4/", "t")).unwrap();
        assert_eq!(client.base_api(), "https://gitlab.example/api/v4");
    }

    #[test]
    fn assignee_update_body() {
        let body = serde_json::to_string(&AssigneeUpdate { assignee_id: 7 }).unwrap();
        assert_eq!(body, r#"{"assignee_id":7}"#);
    }

    mod against_local_server {
        use std::collections::HashMap;
        use std::sync::{Arc, Mutex};

        use axum::{
            Json, Router,
            extract::{Path, Query, State},
            http::{HeaderMap, StatusCode},
            routing::{get, put},
        };
        use serde_json::{Value, json};

        use super::*;
        use crate::errors::GitLabError;
        use crate::types::AccessLevel;

        type Seen = Arc<Mutex<Vec<Value>>>;

        async fn serve(app: Router) -> GitLabClient {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
            GitLabClient::from_config(cfg(&format!("http://{addr}/api/v4"), "glpat-test")).unwrap()
        }

        async fn record_update(
            State(seen): State<Seen>,
            Path((project, iid)): Path<(u64, u64)>,
            headers: HeaderMap,
            Json(body): Json<Value>,
        ) -> Json<Value> {
            seen.lock().unwrap().push(json!({
                "project": project,
                "iid": iid,
                "token": headers["PRIVATE-TOKEN"].to_str().unwrap(),
                "body": body,
            }));
            Json(json!({"iid": iid, "assignee": {"id": body["assignee_id"]}}))
        }

        #[tokio::test]
        async fn update_sends_token_and_assignee() {
            let seen = Seen::default();
            let app = Router::new()
                .route(
                    "/api/v4/projects/{project}/merge_requests/{iid}",
                    put(record_update),
                )
                .with_state(Arc::clone(&seen));
            let client = serve(app).await;

            client.update_merge_request_assignee(42, 17, 7).await.unwrap();

            assert_eq!(
                *seen.lock().unwrap(),
                vec![json!({
                    "project": 42,
                    "iid": 17,
                    "token": "glpat-test",
                    "body": {"assignee_id": 7},
                })]
            );
        }

        #[tokio::test]
        async fn update_with_empty_body_is_ok() {
            let app = Router::new().route(
                "/api/v4/projects/{project}/merge_requests/{iid}",
                put(|| async { StatusCode::NO_CONTENT }),
            );
            let client = serve(app).await;

            client.update_merge_request_assignee(42, 17, 7).await.unwrap();
        }

        #[tokio::test]
        async fn update_rejection_maps_status() {
            let app = Router::new()
                .route(
                    "/api/v4/projects/{project}/merge_requests/{iid}",
                    put(|| async { StatusCode::FORBIDDEN }),
                )
                .route(
                    "/api/v4/users/{id}",
                    get(|| async { (StatusCode::TOO_MANY_REQUESTS, [("Retry-After", "30")]) }),
                );
            let client = serve(app).await;

            let err = client.update_merge_request_assignee(42, 17, 7).await.unwrap_err();
            assert!(matches!(err, GitLabError::Provider(ProviderError::Forbidden)));

            let err = client.get_user(3).await.unwrap_err();
            assert!(matches!(
                err,
                GitLabError::Provider(ProviderError::RateLimited {
                    retry_after_secs: Some(30)
                })
            ));
        }

        #[tokio::test]
        async fn members_page_is_requested_by_query() {
            let app = Router::new().route(
                "/api/v4/projects/{project}/members",
                get(|Query(q): Query<HashMap<String, String>>| async move {
                    // Echo the paging query back through the third member's name.
                    let echo = format!("{}/{}", q["page"], q["per_page"]);
                    Json(json!([
                        {"id": 1, "username": "alice", "name": "Alice", "access_level": 40},
                        null,
                        {"id": 9, "username": "echo", "name": echo, "access_level": 10}
                    ]))
                }),
            );
            let client = serve(app).await;

            let page = client.list_project_members(42, 2, 100).await.unwrap();

            assert_eq!(page.len(), 3);
            assert!(page[1].is_none());
            assert_eq!(page[0].as_ref().unwrap().access_level, AccessLevel::Maintainer);
            assert_eq!(page[2].as_ref().unwrap().display_name, "2/100");
        }
    }
}
