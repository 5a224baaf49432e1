use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::products::models::{
    Product, ProductFilter, ProductPatch, ProductSort, Promotion, Variant,
};
use crate::modules::catalog::{default_limit, ListParams, SortOrder};
use crate::shared::types::Image;
use crate::shared::validation::{validate_price, SLUG_REGEX};

/// Query params for listing products
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductQueryParams {
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
    pub sort_by: ProductSort,

    /// Sort direction (default: asc)
    #[serde(default)]
    pub order: SortOrder,

    /// Case-insensitive match on name
    pub search_term: Option<String>,

    /// Only products in this category
    pub category_id: Option<String>,

    /// Only products with (true) or without (false) variants
    pub has_variants: Option<bool>,

    /// Only products with (true) or without (false) an active promotion
    pub has_promotion: Option<bool>,
}

impl From<ProductQueryParams> for ListParams<Product> {
    fn from(q: ProductQueryParams) -> Self {
        ListParams::new(q.sort_by, q.order)
            .page(q.offset, q.limit)
            .search(q.search_term)
            .filter(ProductFilter {
                category_id: q.category_id,
                has_variants: q.has_variants,
                has_promotion: q.has_promotion,
            })
    }
}

// Create request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateProductDto {
    #[validate(length(min = 1, max = 120))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 5000))]
    pub description: String,

    /// URL slug; derived from the name when omitted
    #[validate(length(max = 140), regex(path = *SLUG_REGEX, message = "slug must be lowercase letters and digits separated by single hyphens"))]
    pub slug: Option<String>,

    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = String, example = "12.50")]
    pub price: Decimal,

    #[validate(length(min = 1))]
    pub category_id: String,

    #[validate(nested)]
    pub image: Image,

    #[serde(default)]
    #[validate(nested)]
    pub variants: Vec<Variant>,

    #[validate(nested)]
    pub promotion: Option<Promotion>,
}

/// Multipart form for creating a product with an uploaded image (OpenAPI documentation only)
#[derive(Debug, ToSchema)]
#[schema(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct UploadProductDto {
    #[schema(example = "Nail Polish")]
    pub name: String,
    pub description: Option<String>,
    pub slug: Option<String>,
    #[schema(example = "12.50")]
    pub price: String,
    pub category_id: String,
    /// Alt text for the image (defaults to the name)
    pub alt: Option<String>,
    /// Image file: jpeg, png, gif or webp, max 5MB
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub image: String,
}

// Update request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProductDto {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    #[validate(length(max = 140), regex(path = *SLUG_REGEX, message = "slug must be lowercase letters and digits separated by single hyphens"))]
    pub slug: Option<String>,

    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = Option<String>, example = "12.50")]
    pub price: Option<Decimal>,

    #[validate(length(min = 1))]
    pub category_id: Option<String>,

    #[validate(nested)]
    pub image: Option<Image>,

    /// Replaces the whole variant list
    #[validate(nested)]
    pub variants: Option<Vec<Variant>>,

    /// Replaces the promotion; set `active: false` to end it
    #[validate(nested)]
    pub promotion: Option<Promotion>,
}

impl From<UpdateProductDto> for ProductPatch {
    fn from(dto: UpdateProductDto) -> Self {
        Self {
            name: dto.name,
            description: dto.description,
            slug: dto.slug,
            price: dto.price,
            category_id: dto.category_id,
            image: dto.image,
            variants: dto.variants,
            promotion: dto.promotion,
        }
    }
}

// Response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponseDto {
    pub id: String,
    pub name: String,
    pub description: String,
    pub slug: String,
    #[schema(value_type = String, example = "12.50")]
    pub price: Decimal,
    pub category_id: String,
    pub image: Image,
    pub variants: Vec<Variant>,
    pub promotion: Option<Promotion>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl From<Product> for ProductResponseDto {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            slug: p.slug,
            price: p.price,
            category_id: p.category_id,
            image: p.image,
            variants: p.variants,
            promotion: p.promotion,
            created_at: p.created_at,
            modified_at: p.modified_at,
        }
    }
}
