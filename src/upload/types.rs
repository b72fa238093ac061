//! Response payloads for the upload endpoint.

use serde::Serialize;

use crate::upload::naming::ResolvedNaming;

/// One stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    /// Name exactly as the client sent it.
    pub original_name: String,
    /// Name on disk.
    pub saved_as: String,
    /// Full path on disk.
    pub path: String,
    #[serde(skip)]
    pub size: u64,
}

/// Summary of a successful upload request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub success: bool,
    pub message: String,
    /// Raw folder name; only for the single-folder scheme.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    #[serde(flatten)]
    pub naming: ResolvedNaming,
    pub folder_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_url: Option<String>,
    pub count: usize,
    pub files: Vec<UploadedFile>,
}

/// Error body; `files` lists what was stored before the failure.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<UploadedFile>>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            count: None,
            files: None,
        }
    }

    pub fn with_stored(mut self, stored: Vec<UploadedFile>) -> Self {
        if !stored.is_empty() {
            self.count = Some(stored.len());
            self.files = Some(stored);
        }
        self
    }
}
