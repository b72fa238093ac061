//! Destination directory resolution.

use std::io;
use std::path::{Path, PathBuf};

use crate::upload::naming::ResolvedNaming;

/// Where one request's files are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    dir: PathBuf,
    url: Option<String>,
}

impl Destination {
    /// Join the safe naming segments under `root`. `mount` is the public URL
    /// prefix of the upload tree when static serving is enabled.
    pub fn resolve(root: &Path, naming: &ResolvedNaming, mount: Option<&str>) -> Self {
        let dir = naming
            .segments()
            .fold(root.to_path_buf(), |dir, segment| dir.join(segment));

        let url = mount.map(|mount| {
            let mut url = mount.trim_end_matches('/').to_string();
            for segment in naming.segments() {
                url.push('/');
                url.push_str(segment);
            }
            url
        });

        debug_assert!(dir.starts_with(root));
        Self { dir, url }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Public URL prefix of the directory, if served.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Final path of a stored file.
    pub fn file_path(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// Create the directory and any missing parents. Already existing is fine.
    pub async fn ensure_exists(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }
}
