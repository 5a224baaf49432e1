use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::categories::models::{Category, CategoryFilter, CategoryPatch, CategorySort};
use crate::modules::catalog::{default_limit, ListParams, SortOrder};
use crate::shared::types::Image;
use crate::shared::validation::SLUG_REGEX;

/// Query params for listing categories
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CategoryQueryParams {
    /// Number of matches to skip
    #[serde(default)]
    #[param(minimum = 0)]
    pub offset: i64,

    /// Items per page (clamped to 100)
    #[serde(default = "default_limit")]
    #[param(minimum = 1, maximum = 100)]
    pub limit: i64,

    /// Sort field (default: name)
    #[serde(default)]
    pub sort_by: CategorySort,

    /// Sort direction (default: asc)
    #[serde(default)]
    pub order: SortOrder,

    /// Case-insensitive match on name
    pub search_term: Option<String>,
}

impl From<CategoryQueryParams> for ListParams<Category> {
    fn from(q: CategoryQueryParams) -> Self {
        ListParams::new(q.sort_by, q.order)
            .page(q.offset, q.limit)
            .search(q.search_term)
            .filter(CategoryFilter)
    }
}

// Create request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateCategoryDto {
    #[validate(length(min = 1, max = 120))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,

    #[validate(nested)]
    pub image: Image,

    /// URL slug; derived from the name when omitted
    #[validate(length(max = 140), regex(path = *SLUG_REGEX, message = "slug must be lowercase letters and digits separated by single hyphens"))]
    pub slug: Option<String>,
}

/// Multipart form for creating a category with an uploaded image (OpenAPI documentation only)
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadCategoryDto {
    #[schema(example = "Nails")]
    pub name: String,
    pub description: Option<String>,
    pub slug: Option<String>,
    /// Alt text for the image (defaults to the name)
    pub alt: Option<String>,
    /// Image file: jpeg, png, gif or webp, max 5MB
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub image: String,
}

// Update request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateCategoryDto {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(nested)]
    pub image: Option<Image>,

    #[validate(length(max = 140), regex(path = *SLUG_REGEX, message = "slug must be lowercase letters and digits separated by single hyphens"))]
    pub slug: Option<String>,
}

impl From<UpdateCategoryDto> for CategoryPatch {
    fn from(dto: UpdateCategoryDto) -> Self {
        Self {
            name: dto.name,
            description: dto.description,
            image: dto.image,
            slug: dto.slug,
        }
    }
}

// Response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponseDto {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: Image,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            image: c.image,
            slug: c.slug,
            created_at: c.created_at,
            modified_at: c.modified_at,
        }
    }
}
