//! Folder-based file upload service library.

// Core subsystems
pub mod config;
pub mod http;
pub mod upload;

// Cross-cutting concerns
pub mod health;
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::UploadConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
