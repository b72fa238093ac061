//! Configuration loading from disk and the environment.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::UploadConfig;
use crate::config::validation::ValidationError;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value {value:?} for {var}")]
    Env { var: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a TOML document into a configuration without validating it.
pub fn parse_config(content: &str) -> Result<UploadConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Read a TOML file without validating it, so later overrides can still fix it.
pub fn read_config(path: &Path) -> Result<UploadConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Apply `UPLOAD_*` overrides from the process environment.
pub fn apply_env_overrides(config: &mut UploadConfig) -> Result<(), ConfigError> {
    apply_overrides(config, |var| std::env::var(var).ok())
}

/// Apply overrides from an arbitrary variable lookup.
pub fn apply_overrides<F>(config: &mut UploadConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |var: &'static str| lookup(var).map(|v| (var, v.trim().to_string()));

    if let Some((_, host)) = get("UPLOAD_HOST") {
        config.listener.host = host;
    }
    if let Some((var, port)) = get("UPLOAD_PORT") {
        config.listener.port = port.parse().map_err(|_| ConfigError::Env { var, value: port })?;
    }
    if let Some((_, root)) = get("UPLOAD_ROOT_DIR") {
        config.storage.root_dir = PathBuf::from(root);
    }
    if let Some((var, scheme)) = get("UPLOAD_NAMING_SCHEME") {
        config.storage.naming_scheme = scheme
            .parse()
            .map_err(|_| ConfigError::Env { var, value: scheme })?;
    }
    if let Some((_, origins)) = get("UPLOAD_CORS_ORIGINS") {
        config.cors.allowed_origins = origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect();
    }
    if let Some((var, max)) = get("UPLOAD_MAX_FILES") {
        config.limits.max_files = max.parse().map_err(|_| ConfigError::Env { var, value: max })?;
    }
    if let Some((var, size)) = get("UPLOAD_MAX_FILE_SIZE") {
        config.limits.max_file_size = if size.is_empty() {
            None
        } else {
            Some(size.parse().map_err(|_| ConfigError::Env { var, value: size })?)
        };
    }
    if let Some((_, level)) = get("UPLOAD_LOG_LEVEL") {
        config.observability.log_level = level;
    }

    Ok(())
}
