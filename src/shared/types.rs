use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::core::error::{AppError, Result};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub meta: Option<Meta>,
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Meta {
    pub total: i64,
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>, meta: Option<Meta>) -> Self {
        Self {
            success: true,
            data,
            message,
            meta,
            errors: None,
        }
    }

    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            meta: None,
            errors,
        }
    }
}

// =============================================================================
// IMAGE
// =============================================================================

/// Image reference attached to categories and products
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct Image {
    /// Public URL of the image
    #[validate(length(min = 1, max = 2048))]
    pub src: String,
    /// Alternative text
    #[validate(length(max = 300))]
    pub alt: String,
}

/// Adapter for images persisted as serialized JSON text blobs.
///
/// Schema of the blob: `{"src": "<url>", "alt": "<text>"}`.
pub struct ImageBlob;

impl ImageBlob {
    pub fn encode(image: &Image) -> Result<String> {
        serde_json::to_string(image)
            .map_err(|e| AppError::Internal(format!("Failed to serialize image: {}", e)))
    }

    pub fn decode(blob: &str) -> Result<Image> {
        serde_json::from_str(blob)
            .map_err(|e| AppError::Internal(format!("Corrupt image blob: {}", e)))
    }
}
