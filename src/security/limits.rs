//! Request size and time limits.
//!
//! # Design Decisions
//! - axum's default 2 MB body cap is lifted; uploads are streamed to disk
//! - An explicit total request cap answers 413 Payload Too Large
//! - Per-file caps are enforced while streaming (see `upload::store`)
//! - No timeout unless one is configured

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

use crate::config::{LimitsConfig, TimeoutConfig};

/// Wrap `router` with the configured body and time limits.
#[allow(deprecated)]
pub fn apply_limits(router: Router, limits: &LimitsConfig, timeouts: &TimeoutConfig) -> Router {
    let mut router = router.layer(DefaultBodyLimit::disable());

    if let Some(max) = limits.max_request_bytes {
        router = router.layer(RequestBodyLimitLayer::new(max));
    }
    if let Some(secs) = timeouts.request_secs {
        router = router.layer(TimeoutLayer::new(Duration::from_secs(secs)));
    }

    router
}
