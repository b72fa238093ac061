//! Startup orchestration.
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The upload root exists and is absolute before the listener binds

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Fatal startup problems.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("cannot create upload root {path}: {source}")]
    UploadRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },
}

/// Create the upload root (recursively) and return its absolute path.
pub fn prepare_upload_root(root: &Path) -> Result<PathBuf, StartupError> {
    let err = |source: io::Error| StartupError::UploadRoot {
        path: root.to_path_buf(),
        source,
    };

    std::fs::create_dir_all(root).map_err(err)?;
    let absolute = std::fs::canonicalize(root).map_err(err)?;

    tracing::info!(root = %absolute.display(), "Upload root ready");
    Ok(absolute)
}
