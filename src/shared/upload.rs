//! Multipart image uploads for category and product creation
//!
//! The raw file is validated here, pushed to object storage, and only its
//! public URL travels further into the catalog.

use std::collections::HashMap;

use axum::extract::Multipart;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::modules::catalog::ResourceKind;
use crate::modules::storage::ObjectStorage;
use crate::shared::constants::{ALLOWED_IMAGE_TYPES, MAX_IMAGE_SIZE};
use crate::shared::types::Image;

/// Name of the multipart field carrying the file
pub const IMAGE_FIELD: &str = "image";

/// A raw image received from a client
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub data: Vec<u8>,
    pub content_type: String,
    pub file_name: Option<String>,
}

impl ImageUpload {
    /// Reject empty files, oversized files and non-image content types
    pub fn validate(&self) -> Result<()> {
        if self.data.is_empty() {
            return Err(AppError::Validation("Image file is empty".to_string()));
        }

        if self.data.len() > MAX_IMAGE_SIZE {
            return Err(AppError::Validation(format!(
                "Image too large: {} bytes (max {} bytes)",
                self.data.len(),
                MAX_IMAGE_SIZE
            )));
        }

        if !ALLOWED_IMAGE_TYPES.contains(&self.content_type.as_str()) {
            return Err(AppError::Validation(format!(
                "Unsupported image type '{}': expected one of {}",
                self.content_type,
                ALLOWED_IMAGE_TYPES.join(", ")
            )));
        }

        Ok(())
    }

    pub fn extension(&self) -> &'static str {
        match self.content_type.as_str() {
            "image/jpeg" => "jpg",
            "image/png" => "png",
            "image/gif" => "gif",
            "image/webp" => "webp",
            _ => "bin",
        }
    }

    /// Object path relative to the public prefix: `<kind>/<uuid>.<ext>`
    pub fn object_path(&self, kind: ResourceKind) -> String {
        format!("{}/{}.{}", kind, Uuid::new_v4().simple(), self.extension())
    }
}

/// Text fields and the optional image file of a multipart form
#[derive(Debug, Default)]
pub struct ImageForm {
    fields: HashMap<String, String>,
    image: Option<ImageUpload>,
}

impl ImageForm {
    /// Drain a multipart body. Unknown file fields are ignored.
    pub async fn read(mut multipart: Multipart) -> Result<Self> {
        let mut form = ImageForm::default();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            debug!("Failed to read multipart field: {}", e);
            AppError::BadRequest(format!("Failed to read multipart data: {}", e))
        })? {
            let name = field.name().unwrap_or("").to_string();

            if name == IMAGE_FIELD {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let file_name = field.file_name().map(|s| s.to_string());

                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read image bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read image data: {}", e))
                })?;

                form.image = Some(ImageUpload {
                    data: data.to_vec(),
                    content_type,
                    file_name,
                });
            } else if field.file_name().is_some() {
                debug!("Ignoring unexpected file field: {}", name);
            } else {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read field '{}': {}", name, e))
                })?;
                form.fields.insert(name, text);
            }
        }

        Ok(form)
    }

    /// Non-blank text field
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    pub fn require_text(&self, name: &str) -> Result<String> {
        self.text(name)
            .ok_or_else(|| AppError::Validation(format!("Field '{}' is required", name)))
    }

    pub fn take_image(&mut self) -> Result<ImageUpload> {
        self.image
            .take()
            .ok_or_else(|| AppError::Validation(format!("Field '{}' is required", IMAGE_FIELD)))
    }
}

/// Validate and store an uploaded image, returning its public reference
pub async fn store_image(
    storage: &dyn ObjectStorage,
    kind: ResourceKind,
    upload: ImageUpload,
    alt: String,
) -> Result<Image> {
    upload.validate()?;

    let path = upload.object_path(kind);
    debug!(
        "Storing {} image '{}' ({} bytes) as '{}'",
        kind,
        upload.file_name.as_deref().unwrap_or("-"),
        upload.data.len(),
        path
    );
    let src = storage
        .put_public(&path, upload.data, &upload.content_type)
        .await?;

    Ok(Image { src, alt })
}

/// Best-effort removal of an image whose record was never created
pub async fn discard_image(storage: &dyn ObjectStorage, image: &Image) {
    if let Err(e) = storage.delete_by_url(&image.src).await {
        warn!("Failed to discard orphaned image '{}': {}", image.src, e);
    }
}
