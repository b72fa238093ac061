//! `POST /upload`.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::multipart::{Field, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::Json;

use crate::observability::metrics;
use crate::upload::destination::Destination;
use crate::upload::error::{UploadError, UploadFailure};
use crate::upload::naming::{NamingFields, NamingScheme, ResolvedNaming};
use crate::upload::store::{sanitize_file_name, FileSink};
use crate::upload::types::{UploadResult, UploadedFile};
use crate::upload::{UploadSettings, FILES_FIELD};

/// Destination chosen at the first file part.
struct Resolved {
    naming: ResolvedNaming,
    destination: Destination,
}

/// Receive a multipart upload and store every file part.
pub async fn upload_handler(
    State(settings): State<Arc<UploadSettings>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResult>, UploadFailure> {
    let started = Instant::now();
    let mut stored = Vec::new();

    let outcome = match multipart {
        Ok(multipart) => receive(&settings, multipart, &mut stored).await,
        Err(rejection) => Err(UploadError::from(rejection)),
    };

    let bytes: u64 = stored.iter().map(|f: &UploadedFile| f.size).sum();

    match outcome {
        Ok(Some(resolved)) => {
            tracing::info!(
                folder = %resolved.destination.dir().display(),
                count = stored.len(),
                bytes,
                "Files uploaded"
            );
            metrics::record_upload("success", stored.len(), bytes, started);
            Ok(Json(build_result(&settings, resolved, stored)))
        }
        Ok(None) => {
            tracing::warn!("Upload rejected: no file parts");
            metrics::record_upload("client_error", 0, 0, started);
            Err(UploadError::NoFiles.into())
        }
        Err(error) => {
            if error.is_client_error() {
                tracing::warn!(error = %error, stored = stored.len(), "Upload rejected");
                metrics::record_upload("client_error", stored.len(), bytes, started);
            } else {
                tracing::error!(
                    error = %error,
                    cause = ?std::error::Error::source(&error),
                    stored = stored.len(),
                    "Upload failed"
                );
                metrics::record_upload("server_error", stored.len(), bytes, started);
            }
            Err(UploadFailure::new(error, stored))
        }
    }
}

/// Walk the multipart body in order. Returns `None` when no file part was seen.
async fn receive(
    settings: &UploadSettings,
    mut multipart: Multipart,
    stored: &mut Vec<UploadedFile>,
) -> Result<Option<Resolved>, UploadError> {
    let scheme = settings.naming_scheme;
    let mut fields = NamingFields::default();
    let mut resolved: Option<Resolved> = None;

    while let Some(mut field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();

        let Some(original_name) = field.file_name().map(str::to_owned) else {
            collect_text_field(scheme, &mut fields, resolved.is_some(), &field_name, field).await?;
            continue;
        };

        // A file input left empty still sends a part, with an empty file name.
        if original_name.is_empty() {
            while field.chunk().await?.is_some() {}
            tracing::trace!(field = %field_name, "Skipping file part without a file name");
            continue;
        }

        if field_name != FILES_FIELD {
            return Err(UploadError::UnexpectedField(field_name));
        }
        if stored.len() >= settings.max_files {
            return Err(UploadError::TooManyFiles {
                max: settings.max_files,
            });
        }
        let saved_as = sanitize_file_name(&original_name)
            .ok_or_else(|| UploadError::InvalidFileName(original_name.clone()))?;

        // The directory is created on the first file part only.
        let destination = match &resolved {
            Some(r) => r.destination.clone(),
            None => {
                let r = resolve_destination(settings, &fields).await?;
                let destination = r.destination.clone();
                resolved = Some(r);
                destination
            }
        };
        let target = destination.file_path(&saved_as);

        let mut sink =
            FileSink::create(destination.dir(), &saved_as, settings.max_file_size).await?;
        while let Some(chunk) = field.chunk().await? {
            sink.write_chunk(&chunk).await?;
        }
        let size = sink.commit(&target).await?;

        tracing::debug!(file = %saved_as, size, path = %target.display(), "Stored file");
        stored.push(UploadedFile {
            original_name,
            saved_as,
            path: target.display().to_string(),
            size,
        });
    }

    Ok(resolved)
}

async fn collect_text_field(
    scheme: NamingScheme,
    fields: &mut NamingFields,
    destination_fixed: bool,
    name: &str,
    field: Field<'_>,
) -> Result<(), UploadError> {
    if !scheme.is_naming_field(name) {
        tracing::trace!(field = %name, "Ignoring unknown text field");
        return Ok(());
    }
    if destination_fixed {
        tracing::warn!(field = %name, "Naming field arrived after the first file part; ignored");
        return Ok(());
    }
    let value = field.text().await?;
    fields.insert(name, value);
    Ok(())
}

async fn resolve_destination(
    settings: &UploadSettings,
    fields: &NamingFields,
) -> Result<Resolved, UploadError> {
    let naming = fields.resolve(settings.naming_scheme);
    let destination = Destination::resolve(
        &settings.root_dir,
        &naming,
        settings.public_mount.as_deref(),
    );

    destination
        .ensure_exists()
        .await
        .map_err(|source| UploadError::CreateDir {
            path: destination.dir().to_path_buf(),
            source,
        })?;

    Ok(Resolved {
        naming,
        destination,
    })
}

fn build_result(
    settings: &UploadSettings,
    resolved: Resolved,
    files: Vec<UploadedFile>,
) -> UploadResult {
    let folder = match settings.naming_scheme {
        NamingScheme::Folder => Some(resolved.naming.primary_raw().to_string()),
        NamingScheme::Hierarchical => None,
    };

    UploadResult {
        success: true,
        message: "Files uploaded successfully".to_string(),
        folder,
        folder_path: resolved.destination.dir().display().to_string(),
        folder_url: resolved.destination.url().map(str::to_owned),
        naming: resolved.naming,
        count: files.len(),
        files,
    }
}
