//! Per-request spans.
//!
//! Every request span carries the `x-request-id` assigned at the edge so log
//! lines from the upload handler can be correlated with the access log.

use axum::body::Body;
use axum::http::{HeaderName, Request};
use tracing::Span;

/// Header carrying the request correlation ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Span factory for `tower_http::trace::TraceLayer`.
pub fn request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}
