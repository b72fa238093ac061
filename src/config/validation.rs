//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (port, limits)
//! - Detect mount paths that would shadow API routes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: UploadConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::UploadConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.port must be non-zero")]
    ZeroPort,

    #[error("storage.root_dir must not be empty")]
    EmptyRootDir,

    #[error("limits.max_files must be at least 1")]
    ZeroMaxFiles,

    #[error("limits.max_file_size must be greater than zero when set")]
    ZeroMaxFileSize,

    #[error("limits.max_request_bytes must be greater than zero when set")]
    ZeroMaxRequestBytes,

    #[error("static_files.mount_path {0:?} must start with '/' and not collide with an API route")]
    InvalidMountPath(String),

    #[error("listener.tls requires both cert_path and key_path")]
    IncompleteTls,

    #[error("timeouts.request_secs must be greater than zero when set")]
    ZeroRequestTimeout,

    #[error("observability.metrics_address {0:?} is not a socket address")]
    InvalidMetricsAddress(String),
}

const RESERVED_PATHS: &[&str] = &["/", "/health", "/upload"];

/// Check a configuration for semantic errors.
pub fn validate_config(config: &UploadConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.port == 0 {
        errors.push(ValidationError::ZeroPort);
    }

    if let Some(tls) = &config.listener.tls {
        if tls.cert_path.trim().is_empty() || tls.key_path.trim().is_empty() {
            errors.push(ValidationError::IncompleteTls);
        }
    }

    if config.storage.root_dir.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyRootDir);
    }

    if config.limits.max_files == 0 {
        errors.push(ValidationError::ZeroMaxFiles);
    }
    if config.limits.max_file_size == Some(0) {
        errors.push(ValidationError::ZeroMaxFileSize);
    }
    if config.limits.max_request_bytes == Some(0) {
        errors.push(ValidationError::ZeroMaxRequestBytes);
    }

    if config.static_files.enabled {
        let mount = config.static_files.mount_path.trim_end_matches('/');
        if !config.static_files.mount_path.starts_with('/')
            || RESERVED_PATHS.contains(&mount)
            || mount.is_empty()
        {
            errors.push(ValidationError::InvalidMountPath(
                config.static_files.mount_path.clone(),
            ));
        }
    }

    if config.timeouts.request_secs == Some(0) {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_socket_addr().is_none()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
