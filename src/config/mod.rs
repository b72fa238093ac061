//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in defaults
//!     → loader.rs (optional TOML file, then UPLOAD_* environment overrides)
//!     → CLI flags (main.rs)
//!     → validation.rs (semantic checks)
//!     → UploadConfig (validated, immutable)
//!     → shared via Arc to the HTTP layer
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{apply_env_overrides, read_config, ConfigError};
pub use schema::{
    CorsConfig, LimitsConfig, ListenerConfig, ObservabilityConfig, StaticFilesConfig,
    StorageConfig, TimeoutConfig, TlsConfig, UploadConfig,
};
pub use validation::{validate_config, ValidationError};
