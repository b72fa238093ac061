//! Error responses.
//!
//! # Responsibilities
//! - Map upload failures to status codes and JSON bodies
//! - Answer unmatched routes with a JSON 404
//!
//! # Design Decisions
//! - Every error body carries `success: false` and a human message
//! - Storage failures never leak filesystem detail to the client

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::upload::types::ErrorBody;
use crate::upload::{UploadError, UploadFailure};

impl IntoResponse for UploadFailure {
    fn into_response(self) -> Response {
        let status = self.error.status();
        let body = ErrorBody::new(self.error.to_string()).with_stored(self.stored);
        (status, Json(body)).into_response()
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        UploadFailure::from(self).into_response()
    }
}

/// Fallback for unknown routes and unsupported methods.
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new("Not found")))
}
