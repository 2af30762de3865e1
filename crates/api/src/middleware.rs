use std::time::Instant;

use axum::{
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

use taproom_core::AuditContext;

use crate::context::RequestContext;

/// Header naming the acting user; absent or blank falls back to the default auditor.
pub const USER_HEADER: HeaderName = HeaderName::from_static("x-user");

/// Correlation id, echoed back on every response.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

#[derive(Debug, Clone)]
pub struct AuditState {
    pub default_auditor: AuditContext,
}

/// Attach a [`RequestContext`] and wrap the request in a span.
///
/// Logs one line per completed request with status and latency.
pub async fn request_context(
    State(state): State<AuditState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let request_id = extract_request_id(req.headers()).unwrap_or_else(Uuid::now_v7);
    let audit = AuditContext::or_fallback(extract_user(req.headers()), &state.default_auditor);

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %req.method(),
        path = %req.uri().path(),
        actor = audit.actor(),
    );

    req.extensions_mut()
        .insert(RequestContext::new(request_id, audit));

    async move {
        let started = Instant::now();
        let mut response = next.run(req).await;

        let status = response.status();
        let elapsed_ms = started.elapsed().as_millis() as u64;
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), elapsed_ms, "request failed");
        } else {
            tracing::info!(status = status.as_u16(), elapsed_ms, "request completed");
        }

        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        response
    }
    .instrument(span)
    .await
}

fn extract_user(headers: &HeaderMap) -> Option<&str> {
    headers.get(USER_HEADER)?.to_str().ok()
}

fn extract_request_id(headers: &HeaderMap) -> Option<Uuid> {
    headers.get(REQUEST_ID_HEADER)?.to_str().ok()?.trim().parse().ok()
}
