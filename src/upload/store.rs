//! Streaming file parts to disk.
//!
//! Bytes go to a hidden temp file in the destination directory and are renamed
//! over the final name once the part is complete. A part that fails midway, or
//! whose request is dropped, leaves nothing behind.

use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::upload::error::UploadError;

/// Longest file name most filesystems accept, in bytes.
pub const MAX_FILE_NAME_BYTES: usize = 255;

/// Reduce a client-supplied file name to a bare file name.
///
/// Directory components (either separator style) are dropped. Returns `None`
/// when nothing usable remains or the name is too long to store.
pub fn sanitize_file_name(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    if base.is_empty() || base == "." || base == ".." || base.contains('\0') {
        return None;
    }
    if base.len() > MAX_FILE_NAME_BYTES {
        return None;
    }
    Some(base.to_string())
}

/// Temp file removed on drop unless committed.
#[derive(Debug)]
struct PartialFile {
    path: PathBuf,
    armed: bool,
}

impl PartialFile {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if self.armed {
            if let Err(e) = std::fs::remove_file(&self.path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove partial upload");
                }
            } else {
                tracing::debug!(path = %self.path.display(), "Removed partial upload");
            }
        }
    }
}

/// Writer for a single file part.
#[derive(Debug)]
pub struct FileSink {
    file: File,
    partial: PartialFile,
    name: String,
    written: u64,
    max_size: Option<u64>,
}

impl FileSink {
    /// Open a temp file in `dir` for the part that will be saved as `name`.
    pub async fn create(dir: &Path, name: &str, max_size: Option<u64>) -> Result<Self, UploadError> {
        let temp_path = dir.join(format!(".upload-{}.part", Uuid::new_v4()));
        let file = File::create(&temp_path)
            .await
            .map_err(|source| UploadError::Storage {
                name: name.to_string(),
                source,
            })?;

        Ok(Self {
            file,
            partial: PartialFile::new(temp_path),
            name: name.to_string(),
            written: 0,
            max_size,
        })
    }

    /// Append a chunk, enforcing the size limit.
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), UploadError> {
        self.written += chunk.len() as u64;
        if let Some(max) = self.max_size {
            if self.written > max {
                return Err(UploadError::FileTooLarge {
                    name: self.name.clone(),
                    max,
                });
            }
        }

        self.file
            .write_all(chunk)
            .await
            .map_err(|source| UploadError::Storage {
                name: self.name.clone(),
                source,
            })
    }

    /// Bytes accepted so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Flush and move the temp file to `target`, replacing any existing file.
    pub async fn commit(self, target: &Path) -> Result<u64, UploadError> {
        let Self {
            mut file,
            mut partial,
            name,
            written,
            ..
        } = self;

        let storage_err = |source: std::io::Error| UploadError::Storage {
            name: name.clone(),
            source,
        };

        file.flush().await.map_err(storage_err)?;
        drop(file);

        tokio::fs::rename(&partial.path, target)
            .await
            .map_err(storage_err)?;
        partial.disarm();

        Ok(written)
    }
}
