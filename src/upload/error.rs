//! Upload failure taxonomy.

use std::io;
use std::path::PathBuf;

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::http::StatusCode;
use thiserror::Error;

use crate::upload::types::UploadedFile;

/// Why an upload request failed.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No files uploaded")]
    NoFiles,

    #[error("Invalid upload request: {}", .0.body_text())]
    Rejected(#[from] MultipartRejection),

    #[error("Malformed multipart body: {}", .0.body_text())]
    Multipart(#[from] MultipartError),

    #[error("Too many files (maximum is {max})")]
    TooManyFiles { max: usize },

    #[error("Unexpected file field '{0}'")]
    UnexpectedField(String),

    #[error("Invalid file name '{0}'")]
    InvalidFileName(String),

    #[error("File '{name}' exceeds the maximum size of {max} bytes")]
    FileTooLarge { name: String, max: u64 },

    #[error("Failed to create upload directory")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to store file '{name}'")]
    Storage {
        name: String,
        #[source]
        source: io::Error,
    },
}

impl UploadError {
    pub fn status(&self) -> StatusCode {
        match self {
            UploadError::NoFiles
            | UploadError::TooManyFiles { .. }
            | UploadError::UnexpectedField(_)
            | UploadError::InvalidFileName(_) => StatusCode::BAD_REQUEST,
            UploadError::Rejected(rejection) => rejection.status(),
            UploadError::Multipart(err) => err.status(),
            UploadError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            UploadError::CreateDir { .. } | UploadError::Storage { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Client mistakes, as opposed to server-side storage failures.
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }
}

/// An upload error together with the files already stored by the same request.
#[derive(Debug)]
pub struct UploadFailure {
    pub error: UploadError,
    pub stored: Vec<UploadedFile>,
}

impl UploadFailure {
    pub fn new(error: UploadError, stored: Vec<UploadedFile>) -> Self {
        Self { error, stored }
    }
}

impl From<UploadError> for UploadFailure {
    fn from(error: UploadError) -> Self {
        Self::new(error, Vec::new())
    }
}
