//! Guard for the static upload route.
//!
//! Parts are staged as hidden temp files inside the served tree, so any path
//! with a dot-prefixed segment is answered with 404 before `ServeDir` sees it.

use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::http::response::not_found;

pub async fn hide_dotfiles(request: Request<Body>, next: Next) -> Response {
    if is_hidden(request.uri().path()) {
        tracing::debug!(path = %request.uri().path(), "Refusing hidden path");
        return not_found().await.into_response();
    }
    next.run(request).await
}

/// True when any segment starts with `.`, percent-encoded or not.
fn is_hidden(path: &str) -> bool {
    path.split('/').any(|segment| {
        segment.starts_with('.')
            || segment
                .get(..3)
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case("%2e"))
    })
}
