use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::query_builder::Separated;
use sqlx::types::Json;
use sqlx::{FromRow, Postgres, QueryBuilder};
use utoipa::ToSchema;
use validator::Validate;

use crate::core::error::Result;
use crate::modules::catalog::{compare_text, PgRecord, Record, ResourceKind, SortField};
use crate::shared::types::{Image, ImageBlob};
use crate::shared::validation::validate_price;

/// A purchasable variant of a product (shade, size, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    #[validate(length(min = 1, max = 120))]
    pub name: String,

    /// Overrides the product price when set
    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = Option<String>, example = "12.50")]
    pub price: Option<Decimal>,
}

/// Promotional price for a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = String, example = "9.99")]
    pub price: Decimal,

    pub active: bool,
}

/// Domain model for product
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub slug: String,
    pub price: Decimal,
    pub category_id: String,
    pub image: Image,
    pub variants: Vec<Variant>,
    pub promotion: Option<Promotion>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Product {
    pub fn has_variants(&self) -> bool {
        !self.variants.is_empty()
    }

    pub fn has_active_promotion(&self) -> bool {
        self.promotion.as_ref().is_some_and(|p| p.active)
    }
}

/// Database row for product; `variants` and `promotion` are JSONB
#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub slug: String,
    pub price: Decimal,
    pub category_id: String,
    pub image: String,
    pub variants: Json<Vec<Variant>>,
    pub promotion: Option<Json<Promotion>>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// Sortable product fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ProductSort {
    #[default]
    Name,
    Price,
    CreatedAt,
    ModifiedAt,
}

impl SortField for ProductSort {
    fn as_str(&self) -> &'static str {
        match self {
            ProductSort::Name => "name",
            ProductSort::Price => "price",
            ProductSort::CreatedAt => "createdAt",
            ProductSort::ModifiedAt => "modifiedAt",
        }
    }

    fn column(&self) -> &'static str {
        match self {
            ProductSort::Name => "name",
            ProductSort::Price => "price",
            ProductSort::CreatedAt => "created_at",
            ProductSort::ModifiedAt => "modified_at",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category_id: Option<String>,
    pub has_variants: Option<bool>,
    pub has_promotion: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub slug: Option<String>,
    pub price: Option<Decimal>,
    pub category_id: Option<String>,
    pub image: Option<Image>,
    pub variants: Option<Vec<Variant>>,
    pub promotion: Option<Promotion>,
}

impl Record for Product {
    const KIND: ResourceKind = ResourceKind::Product;
    const HAS_SLUG: bool = true;

    type Sort = ProductSort;
    type Filter = ProductFilter;
    type Patch = ProductPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn slug(&self) -> Option<&str> {
        Some(&self.slug)
    }

    fn search_text(&self) -> &str {
        &self.name
    }

    fn matches(&self, filter: &ProductFilter) -> bool {
        filter
            .category_id
            .as_ref()
            .is_none_or(|id| *id == self.category_id)
            && filter.has_variants.is_none_or(|v| v == self.has_variants())
            && filter
                .has_promotion
                .is_none_or(|p| p == self.has_active_promotion())
    }

    fn compare(&self, other: &Self, field: ProductSort) -> Ordering {
        match field {
            ProductSort::Name => compare_text(&self.name, &other.name),
            ProductSort::Price => self.price.cmp(&other.price),
            ProductSort::CreatedAt => self.created_at.cmp(&other.created_at),
            ProductSort::ModifiedAt => self.modified_at.cmp(&other.modified_at),
        }
    }

    fn patch_is_empty(patch: &ProductPatch) -> bool {
        patch.name.is_none()
            && patch.description.is_none()
            && patch.slug.is_none()
            && patch.price.is_none()
            && patch.category_id.is_none()
            && patch.image.is_none()
            && patch.variants.is_none()
            && patch.promotion.is_none()
    }

    fn apply(&mut self, patch: ProductPatch, modified_at: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(slug) = patch.slug {
            self.slug = slug;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(category_id) = patch.category_id {
            self.category_id = category_id;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        if let Some(variants) = patch.variants {
            self.variants = variants;
        }
        if let Some(promotion) = patch.promotion {
            self.promotion = Some(promotion);
        }
        self.modified_at = modified_at;
    }
}

impl PgRecord for Product {
    type Row = ProductRow;

    const TABLE: &'static str = "products";
    const COLUMNS: &'static str = "id, name, description, slug, price, category_id, image, \
                                   variants, promotion, created_at, modified_at";
    const SEARCH_COLUMN: &'static str = "name";
    const SLUG_COLUMN: Option<&'static str> = Some("slug");

    fn from_row(row: ProductRow) -> Result<Self> {
        Ok(Self {
            image: ImageBlob::decode(&row.image)?,
            id: row.id,
            name: row.name,
            description: row.description,
            slug: row.slug,
            price: row.price,
            category_id: row.category_id,
            variants: row.variants.0,
            promotion: row.promotion.map(|p| p.0),
            created_at: row.created_at,
            modified_at: row.modified_at,
        })
    }

    fn push_filter(filter: &ProductFilter, qb: &mut QueryBuilder<'_, Postgres>) {
        if let Some(category_id) = &filter.category_id {
            qb.push(" AND category_id = ");
            qb.push_bind(category_id.clone());
        }

        match filter.has_variants {
            Some(true) => {
                qb.push(" AND jsonb_array_length(variants) > 0");
            }
            Some(false) => {
                qb.push(" AND jsonb_array_length(variants) = 0");
            }
            None => {}
        }

        match filter.has_promotion {
            Some(true) => {
                qb.push(" AND COALESCE((promotion->>'active')::boolean, FALSE)");
            }
            Some(false) => {
                qb.push(" AND NOT COALESCE((promotion->>'active')::boolean, FALSE)");
            }
            None => {}
        }
    }

    fn push_values(&self, values: &mut Separated<'_, '_, Postgres, &'static str>) -> Result<()> {
        values.push_bind(self.id.clone());
        values.push_bind(self.name.clone());
        values.push_bind(self.description.clone());
        values.push_bind(self.slug.clone());
        values.push_bind(self.price);
        values.push_bind(self.category_id.clone());
        values.push_bind(ImageBlob::encode(&self.image)?);
        values.push_bind(Json(self.variants.clone()));
        values.push_bind(self.promotion.clone().map(Json));
        values.push_bind(self.created_at);
        values.push_bind(self.modified_at);
        Ok(())
    }

    fn push_patch(
        patch: &ProductPatch,
        set: &mut Separated<'_, '_, Postgres, &'static str>,
    ) -> Result<()> {
        if let Some(name) = &patch.name {
            set.push("name = ").push_bind_unseparated(name.clone());
        }
        if let Some(description) = &patch.description {
            set.push("description = ")
                .push_bind_unseparated(description.clone());
        }
        if let Some(slug) = &patch.slug {
            set.push("slug = ").push_bind_unseparated(slug.clone());
        }
        if let Some(price) = patch.price {
            set.push("price = ").push_bind_unseparated(price);
        }
        if let Some(category_id) = &patch.category_id {
            set.push("category_id = ")
                .push_bind_unseparated(category_id.clone());
        }
        if let Some(image) = &patch.image {
            set.push("image = ")
                .push_bind_unseparated(ImageBlob::encode(image)?);
        }
        if let Some(variants) = &patch.variants {
            set.push("variants = ")
                .push_bind_unseparated(Json(variants.clone()));
        }
        if let Some(promotion) = &patch.promotion {
            set.push("promotion = ")
                .push_bind_unseparated(Json(promotion.clone()));
        }
        Ok(())
    }
}
