//! Upload subsystem.
//!
//! # Data Flow
//! ```text
//! multipart body
//!     → naming.rs (collect naming fields, raw + safe forms)
//!     → destination.rs (root/<safe>[/<safe>/<safe>], created on first file part)
//!     → store.rs (stream each part to a temp file, rename into place)
//!     → types.rs (Upload Result JSON)
//! ```
//!
//! # Design Decisions
//! - Nothing is kept between requests; the filesystem is the only shared state
//! - Same file name in the same folder overwrites (last write wins)
//! - Abort on first failure; files already stored stay and are reported

pub mod destination;
pub mod error;
pub mod handler;
pub mod naming;
pub mod store;
pub mod types;

use std::path::PathBuf;

use crate::config::UploadConfig;

pub use error::{UploadError, UploadFailure};
pub use handler::upload_handler;
pub use naming::{NamingScheme, NamingValue, ResolvedNaming};
pub use types::{UploadResult, UploadedFile};

/// Multipart field name carrying file parts.
pub const FILES_FIELD: &str = "files";

/// Request-independent settings the handler works with.
#[derive(Debug, Clone)]
pub struct UploadSettings {
    /// Absolute root of the upload tree.
    pub root_dir: PathBuf,
    pub naming_scheme: NamingScheme,
    pub max_files: usize,
    pub max_file_size: Option<u64>,
    /// URL prefix of the upload tree when static serving is on.
    pub public_mount: Option<String>,
}

impl UploadSettings {
    /// Derive handler settings from config and the prepared root directory.
    pub fn from_config(config: &UploadConfig, root_dir: PathBuf) -> Self {
        Self {
            root_dir,
            naming_scheme: config.storage.naming_scheme,
            max_files: config.limits.max_files,
            max_file_size: config.limits.max_file_size,
            public_mount: config
                .static_files
                .enabled
                .then(|| config.static_files.mount_path.clone()),
        }
    }
}
