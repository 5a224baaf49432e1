use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::query_builder::Separated;
use sqlx::{FromRow, Postgres, QueryBuilder};
use utoipa::ToSchema;

use crate::core::error::Result;
use crate::modules::catalog::{compare_text, PgRecord, Record, ResourceKind, SortField};
use crate::shared::types::{Image, ImageBlob};

/// Domain model for category
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: Image,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// Database row for category; `image` is a serialized blob
#[derive(Debug, Clone, FromRow)]
pub struct CategoryRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// Sortable category fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum CategorySort {
    #[default]
    Name,
    CreatedAt,
    ModifiedAt,
}

impl SortField for CategorySort {
    fn as_str(&self) -> &'static str {
        match self {
            CategorySort::Name => "name",
            CategorySort::CreatedAt => "createdAt",
            CategorySort::ModifiedAt => "modifiedAt",
        }
    }

    fn column(&self) -> &'static str {
        match self {
            CategorySort::Name => "name",
            CategorySort::CreatedAt => "created_at",
            CategorySort::ModifiedAt => "modified_at",
        }
    }
}

/// Categories are filtered by search term only
#[derive(Debug, Clone, Default)]
pub struct CategoryFilter;

#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<Image>,
    pub slug: Option<String>,
}

impl Record for Category {
    const KIND: ResourceKind = ResourceKind::Category;
    const HAS_SLUG: bool = true;

    type Sort = CategorySort;
    type Filter = CategoryFilter;
    type Patch = CategoryPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn slug(&self) -> Option<&str> {
        Some(&self.slug)
    }

    fn search_text(&self) -> &str {
        &self.name
    }

    fn matches(&self, _filter: &CategoryFilter) -> bool {
        true
    }

    fn compare(&self, other: &Self, field: CategorySort) -> Ordering {
        match field {
            CategorySort::Name => compare_text(&self.name, &other.name),
            CategorySort::CreatedAt => self.created_at.cmp(&other.created_at),
            CategorySort::ModifiedAt => self.modified_at.cmp(&other.modified_at),
        }
    }

    fn patch_is_empty(patch: &CategoryPatch) -> bool {
        patch.name.is_none()
            && patch.description.is_none()
            && patch.image.is_none()
            && patch.slug.is_none()
    }

    fn apply(&mut self, patch: CategoryPatch, modified_at: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        if let Some(slug) = patch.slug {
            self.slug = slug;
        }
        self.modified_at = modified_at;
    }
}

impl PgRecord for Category {
    type Row = CategoryRow;

    const TABLE: &'static str = "categories";
    const COLUMNS: &'static str = "id, name, description, image, slug, created_at, modified_at";
    const SEARCH_COLUMN: &'static str = "name";
    const SLUG_COLUMN: Option<&'static str> = Some("slug");

    fn from_row(row: CategoryRow) -> Result<Self> {
        Ok(Self {
            image: ImageBlob::decode(&row.image)?,
            id: row.id,
            name: row.name,
            description: row.description,
            slug: row.slug,
            created_at: row.created_at,
            modified_at: row.modified_at,
        })
    }

    fn push_filter(_filter: &CategoryFilter, _qb: &mut QueryBuilder<'_, Postgres>) {}

    fn push_values(&self, values: &mut Separated<'_, '_, Postgres, &'static str>) -> Result<()> {
        values.push_bind(self.id.clone());
        values.push_bind(self.name.clone());
        values.push_bind(self.description.clone());
        values.push_bind(ImageBlob::encode(&self.image)?);
        values.push_bind(self.slug.clone());
        values.push_bind(self.created_at);
        values.push_bind(self.modified_at);
        Ok(())
    }

    fn push_patch(
        patch: &CategoryPatch,
        set: &mut Separated<'_, '_, Postgres, &'static str>,
    ) -> Result<()> {
        if let Some(name) = &patch.name {
            set.push("name = ").push_bind_unseparated(name.clone());
        }
        if let Some(description) = &patch.description {
            set.push("description = ")
                .push_bind_unseparated(description.clone());
        }
        if let Some(image) = &patch.image {
            set.push("image = ")
                .push_bind_unseparated(ImageBlob::encode(image)?);
        }
        if let Some(slug) = &patch.slug {
            set.push("slug = ").push_bind_unseparated(slug.clone());
        }
        Ok(())
    }
}
