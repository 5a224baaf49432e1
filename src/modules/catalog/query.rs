use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::error::{AppError, Result};
use crate::modules::catalog::Record;
use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    /// Orient an ascending comparison
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// Text ordering for in-memory sorts: case-folded first, so "apple" sorts
/// before "Banana" as it does under the database's linguistic collation.
/// Raw byte order breaks ties between names that differ only in case.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Default for the `limit` query parameter
pub fn default_limit() -> i64 {
    DEFAULT_PAGE_SIZE
}

/// Filter/sort/pagination descriptor for a list query
#[derive(Debug, Clone)]
pub struct ListParams<R: Record> {
    pub offset: i64,
    pub limit: i64,
    pub sort_by: R::Sort,
    pub order: SortOrder,
    pub search_term: Option<String>,
    pub filter: R::Filter,
}

impl<R: Record> ListParams<R> {
    pub fn new(sort_by: R::Sort, order: SortOrder) -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_PAGE_SIZE,
            sort_by,
            order,
            search_term: None,
            filter: R::Filter::default(),
        }
    }

    pub fn page(mut self, offset: i64, limit: i64) -> Self {
        self.offset = offset;
        self.limit = limit;
        self
    }

    pub fn search(mut self, term: Option<String>) -> Self {
        self.search_term = term;
        self
    }

    pub fn filter(mut self, filter: R::Filter) -> Self {
        self.filter = filter;
        self
    }

    /// Reject negative offsets and non-positive limits
    pub fn validate(&self) -> Result<()> {
        if self.offset < 0 {
            return Err(AppError::Validation(format!(
                "offset must be non-negative, got {}",
                self.offset
            )));
        }
        if self.limit < 1 {
            return Err(AppError::Validation(format!(
                "limit must be positive, got {}",
                self.limit
            )));
        }
        Ok(())
    }

    /// Limit actually applied to the store
    pub fn effective_limit(&self) -> i64 {
        self.limit.clamp(1, MAX_PAGE_SIZE)
    }

    /// Search term, if any; blank terms mean "no search"
    pub fn term(&self) -> Option<&str> {
        self.search_term
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Case-insensitive "contains" match used by non-SQL backends
    pub fn matches_term(&self, text: &str) -> bool {
        match self.term() {
            Some(term) => text.to_lowercase().contains(&term.to_lowercase()),
            None => true,
        }
    }
}

/// Single-record lookup: exactly one of id or slug
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Id(String),
    Slug(String),
}

impl Lookup {
    /// Build a lookup from optional parts, requiring exactly one of them
    pub fn from_parts(id: Option<String>, slug: Option<String>) -> Result<Self> {
        match (id, slug) {
            (Some(id), None) => Ok(Lookup::Id(id)),
            (None, Some(slug)) => Ok(Lookup::Slug(slug)),
            (Some(_), Some(_)) => Err(AppError::Validation(
                "Supply either id or slug, not both".to_string(),
            )),
            (None, None) => Err(AppError::Validation(
                "Either id or slug is required".to_string(),
            )),
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Lookup::Id(v) | Lookup::Slug(v) => v,
        }
    }

    pub fn matches<R: Record>(&self, record: &R) -> bool {
        match self {
            Lookup::Id(id) => record.id() == id,
            Lookup::Slug(slug) => record.slug() == Some(slug.as_str()),
        }
    }
}

/// One page of a list query plus the unpaginated match count
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub total: i64,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            total: self.total,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}
