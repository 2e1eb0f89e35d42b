//! Profile photo intake: type and size checks, then a write to the upload dir.

use std::path::{Path, PathBuf};

use actix_multipart::Field;
use actix_web::web;
use futures_util::StreamExt;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

const ALLOWED_EXTENSIONS: [&str; 3] = ["jpeg", "jpg", "png"];
const ALLOWED_MIME: [&str; 2] = ["image/jpeg", "image/png"];

#[derive(Debug)]
pub struct Photo {
    pub extension: String,
    pub bytes: Vec<u8>,
}

/// Extension and mime type must both name jpeg/jpg/png.
pub fn check_type(filename: Option<&str>, mime: Option<&str>) -> AppResult<String> {
    let extension = filename
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()));

    let mime_ok = mime.is_some_and(|m| ALLOWED_MIME.contains(&m));

    match extension {
        Some(ext) if mime_ok => Ok(ext),
        _ => Err(AppError::validation(
            "Only images are allowed (jpeg, jpg, png)",
        )),
    }
}

/// Buffers a multipart file part, refusing anything over `max_bytes`.
pub async fn read_photo(mut field: Field, max_bytes: usize) -> AppResult<Photo> {
    let filename = field
        .content_disposition()
        .and_then(|cd| cd.get_filename())
        .map(str::to_owned);
    let mime = field.content_type().map(|m| m.essence_str().to_owned());

    let extension = check_type(filename.as_deref(), mime.as_deref())?;

    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| AppError::validation(format!("Malformed upload: {e}")))?;
        if bytes.len() + chunk.len() > max_bytes {
            return Err(AppError::validation(format!(
                "Photo exceeds the {max_bytes} byte limit"
            )));
        }
        bytes.extend_from_slice(&chunk);
    }

    if bytes.is_empty() {
        return Err(AppError::validation("Photo is empty"));
    }

    Ok(Photo { extension, bytes })
}

pub fn new_reference(photo: &Photo) -> String {
    format!("{}.{}", Uuid::new_v4().to_simple(), photo.extension)
}

pub async fn save(upload_dir: &str, reference: &str, photo: Photo) -> AppResult<()> {
    let dir = PathBuf::from(upload_dir);
    let path = dir.join(reference);
    debug!(path = %path.display(), size = photo.bytes.len(), "Writing photo");

    web::block(move || {
        std::fs::create_dir_all(&dir)?;
        std::fs::write(&path, &photo.bytes)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Photo writer failed: {e}")))?
    .map_err(|e| AppError::Internal(format!("Failed to store photo: {e}")))
}

/// Best effort removal of a rolled-back or replaced photo.
pub async fn discard(upload_dir: &str, reference: &str) {
    let path = PathBuf::from(upload_dir).join(reference);

    match web::block(move || std::fs::remove_file(path)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, reference, "Failed to remove photo"),
        Err(e) => warn!(error = %e, reference, "Failed to remove photo"),
    }
}

pub fn public_url(base_url: &str, reference: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), reference)
}
