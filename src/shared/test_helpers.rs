//! Fixtures shared by unit tests

use std::cmp::Ordering;

use chrono::{DateTime, TimeZone, Utc};

use crate::modules::catalog::{compare_text, Record, ResourceKind, SortField};
use crate::shared::validation::slugify;

/// Fixed timestamp so fixtures compare equal across runs
pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

/// Minimal slugged record used to exercise the generic catalog layer
#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub weight: i32,
    pub modified_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WidgetSort {
    Name,
    Weight,
}

impl SortField for WidgetSort {
    fn as_str(&self) -> &'static str {
        match self {
            WidgetSort::Name => "name",
            WidgetSort::Weight => "weight",
        }
    }

    fn column(&self) -> &'static str {
        self.as_str()
    }
}

#[derive(Debug, Clone, Default)]
pub struct WidgetFilter {
    pub weight: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct WidgetPatch {
    pub name: Option<String>,
    pub weight: Option<i32>,
}

impl Record for Widget {
    const KIND: ResourceKind = ResourceKind::Category;
    const HAS_SLUG: bool = true;

    type Sort = WidgetSort;
    type Filter = WidgetFilter;
    type Patch = WidgetPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn slug(&self) -> Option<&str> {
        Some(&self.slug)
    }

    fn search_text(&self) -> &str {
        &self.name
    }

    fn matches(&self, filter: &WidgetFilter) -> bool {
        filter.weight.is_none_or(|w| w == self.weight)
    }

    fn compare(&self, other: &Self, field: WidgetSort) -> Ordering {
        match field {
            WidgetSort::Name => compare_text(&self.name, &other.name),
            WidgetSort::Weight => self.weight.cmp(&other.weight),
        }
    }

    fn patch_is_empty(patch: &WidgetPatch) -> bool {
        patch.name.is_none() && patch.weight.is_none()
    }

    fn apply(&mut self, patch: WidgetPatch, modified_at: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.slug = slugify(&name).unwrap_or_default();
            self.name = name;
        }
        if let Some(weight) = patch.weight {
            self.weight = weight;
        }
        self.modified_at = modified_at;
    }
}

pub fn widget(id: &str, name: &str, weight: i32) -> Widget {
    Widget {
        id: id.to_string(),
        name: name.to_string(),
        slug: slugify(name).unwrap_or_default(),
        weight,
        modified_at: fixed_time(),
    }
}

/// A tiny valid PNG header, enough for content-type based checks
pub fn png_bytes() -> Vec<u8> {
    vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]
}
