// src/services/images.rs
//! Image storage for user and car pictures.
//!
//! Clients send images as base64 strings inside JSON bodies. The payload is
//! decoded, type-sniffed, resized to fit the caller's bounding box, and
//! re-encoded as JPEG under the storage folder. Rows reference the file by
//! its `/image/<name>` URL; serving the files is left to the front proxy.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{imageops::FilterType, ImageFormat};
use infer::Infer;
use std::io::Cursor;
use std::path::PathBuf;
use tokio::fs as tokio_fs;
use tracing::{error, info, warn};

use crate::common::{generate_raw_id, ApiError};

pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Decode, validate, resize, and persist a base64 image payload.
    /// Returns the URL path the stored file is referenced by.
    pub async fn store_base64(&self, data: &str, max_dim: u32) -> Result<String, ApiError> {
        // Accept both bare base64 and data-URL payloads.
        let raw = data.rsplit(',').next().unwrap_or(data).trim();

        let bytes = STANDARD
            .decode(raw)
            .map_err(|_| ApiError::Validation("image: not valid base64 data".to_string()))?;

        let infer = Infer::new();
        let is_valid = infer
            .get(&bytes)
            .map(|info| {
                matches!(
                    info.mime_type(),
                    "image/jpeg" | "image/jpg" | "image/png" | "image/gif" | "image/webp"
                )
            })
            .unwrap_or(false);

        if !is_valid {
            return Err(ApiError::Validation(
                "image: unsupported type, only JPEG, PNG, GIF, and WebP are accepted".to_string(),
            ));
        }

        let img = image::load_from_memory(&bytes)
            .map_err(|_| ApiError::Validation("image: data could not be decoded".to_string()))?;

        let resized = img.resize(max_dim, max_dim, FilterType::Lanczos3);

        let mut encoded = Vec::new();
        resized
            .write_to(&mut Cursor::new(&mut encoded), ImageFormat::Jpeg)
            .map_err(|e| {
                error!(error = %e, "Failed to encode image as JPEG");
                ApiError::Internal("failed to encode image".to_string())
            })?;

        let filename = format!("{}.jpg", generate_raw_id(12));
        let file_path = self.dir.join(&filename);

        tokio_fs::write(&file_path, &encoded).await.map_err(|e| {
            error!(error = %e, file_path = %file_path.display(), "Failed to save image file");
            ApiError::Internal("failed to save image file".to_string())
        })?;

        info!(filename = %filename, "Image file saved successfully");

        Ok(format!("/image/{}", filename))
    }

    /// Best-effort removal of a stored image. Failures are logged and
    /// swallowed so the primary mutation proceeds.
    pub async fn remove(&self, url: &str) {
        let Some(filename) = url.strip_prefix("/image/") else {
            return;
        };

        // No path separators past this point.
        if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
            warn!(url = %url, "Refusing to remove image with suspicious path");
            return;
        }

        let file_path = self.dir.join(filename);
        if let Err(e) = tokio_fs::remove_file(&file_path).await {
            warn!(
                error = %e,
                file_path = %file_path.display(),
                "Failed to remove image file"
            );
        }
    }
}
