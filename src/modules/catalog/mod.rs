//! Catalog query layer
//!
//! Resource-agnostic list/get/add/update/remove over a pluggable persistence
//! boundary. Each resource kind (category, product, order, message) plugs in
//! by implementing [`Record`] (and [`PgRecord`] for the Postgres backend).
//!
//! ## Backends
//!
//! | Backend | Type | Used for |
//! |---------|------|----------|
//! | PostgreSQL | [`PgRepository`] | production |
//! | In-process | [`MemoryRepository`] | `STORE_BACKEND=memory`, tests |

mod memory;
mod postgres;
mod query;
mod service;

use std::cmp::Ordering;
use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::core::error::Result;

pub use memory::MemoryRepository;
pub use postgres::{PgRecord, PgRepository};
pub use query::{compare_text, default_limit, ListParams, Lookup, Page, SortOrder};
pub use service::{CatalogService, NewRecordMeta};

/// The resource kinds served by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Category,
    Product,
    Order,
    Message,
}

impl ResourceKind {
    /// Identifier prefix and log name
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Category => "category",
            ResourceKind::Product => "product",
            ResourceKind::Order => "order",
            ResourceKind::Message => "message",
        }
    }

    /// Human readable name used in error messages
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Category => "Category",
            ResourceKind::Product => "Product",
            ResourceKind::Order => "Order",
            ResourceKind::Message => "Message",
        }
    }

    /// Generate a new identifier: `<kind>-<uuid v4 simple>`
    pub fn new_id(&self) -> String {
        format!("{}-{}", self.as_str(), Uuid::new_v4().simple())
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sortable field of a resource kind
///
/// Each kind enumerates its own fields, so callers can only sort on columns
/// the kind exposes.
pub trait SortField: Copy + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Name used on the wire (`sortBy=createdAt`)
    fn as_str(&self) -> &'static str;

    /// Column used by the SQL backend
    fn column(&self) -> &'static str;
}

/// A record stored in the catalog
pub trait Record: Clone + fmt::Debug + Send + Sync + 'static {
    const KIND: ResourceKind;

    /// Whether records of this kind can be looked up by slug
    const HAS_SLUG: bool = false;

    type Sort: SortField;
    type Filter: Clone + fmt::Debug + Default + Send + Sync + 'static;
    type Patch: Clone + fmt::Debug + Send + Sync + 'static;

    fn id(&self) -> &str;

    fn slug(&self) -> Option<&str> {
        None
    }

    /// Text the search term is matched against
    fn search_text(&self) -> &str;

    /// Resource-specific filter predicates (search is handled separately)
    fn matches(&self, filter: &Self::Filter) -> bool;

    /// Ascending comparison on a single sort field
    fn compare(&self, other: &Self, field: Self::Sort) -> Ordering;

    fn patch_is_empty(patch: &Self::Patch) -> bool;

    /// Apply the supplied fields and stamp `modified_at`
    fn apply(&mut self, patch: Self::Patch, modified_at: DateTime<Utc>);
}

/// Persistence boundary for one record type
#[async_trait]
pub trait Repository<R: Record>: Send + Sync {
    /// Filtered, sorted, paginated read
    async fn find_many(&self, params: &ListParams<R>) -> Result<Vec<R>>;

    /// Number of records matching the filter, ignoring pagination
    async fn count(&self, params: &ListParams<R>) -> Result<i64>;

    async fn find_one(&self, lookup: &Lookup) -> Result<Option<R>>;

    async fn insert(&self, record: R) -> Result<R>;

    /// Returns `None` when no record has this id
    async fn update(&self, id: &str, patch: R::Patch, modified_at: DateTime<Utc>)
        -> Result<Option<R>>;

    /// Returns `false` when no record has this id
    async fn delete(&self, id: &str) -> Result<bool>;
}
