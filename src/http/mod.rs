//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware, routes)
//!     → GET /health      → health
//!     → POST /upload     → upload::handler
//!     → GET /uploads/*   → ServeDir over the upload root
//!     → anything else    → response.rs (JSON 404)
//! ```

pub mod response;
pub mod server;

pub use server::{build_router, AppState, HttpServer};
