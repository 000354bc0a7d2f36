use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";
const GITLAB_EVENT_UUID_HEADER: &str = "X-Gitlab-Event-UUID";

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Caller's `X-Request-Id`, else GitLab's delivery UUID, else a generated one.
fn resolve_request_id(headers: &HeaderMap) -> String {
    if let Some(id) = header_str(headers, REQUEST_ID_HEADER)
        .or_else(|| header_str(headers, GITLAB_EVENT_UUID_HEADER))
    {
        return id.to_string();
    }
    let nanos = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Utc::now().timestamp_micros() * 1000);
    format!("req-{nanos}")
}

/// Makes sure every request and its response carry an `X-Request-Id`.
pub async fn ensure_request_id(mut req: Request<Body>, next: Next) -> Response {
    let id = resolve_request_id(req.headers());
    let value = HeaderValue::from_str(&id).ok();

    if let Some(value) = &value {
        req.headers_mut().insert(REQUEST_ID_HEADER, value.clone());
    }

    let mut res = next.run(req).await;
    if let Some(value) = value {
        res.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    res
}
