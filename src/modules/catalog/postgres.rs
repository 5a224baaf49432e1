use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::query_builder::Separated;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use crate::core::error::{AppError, Result};
use crate::modules::catalog::{ListParams, Lookup, Record, Repository, SortField};

/// SQL mapping of a record type
pub trait PgRecord: Record {
    /// Row as read from the table, before blob decoding
    type Row: for<'r> FromRow<'r, PgRow> + Send + Unpin;

    const TABLE: &'static str;

    /// Column list, in the order [`PgRecord::push_values`] binds them
    const COLUMNS: &'static str;

    /// Column matched by the search term
    const SEARCH_COLUMN: &'static str;

    const SLUG_COLUMN: Option<&'static str> = None;

    fn from_row(row: Self::Row) -> Result<Self>;

    /// Push ` AND <predicate>` fragments for the resource-specific filter
    fn push_filter(filter: &Self::Filter, qb: &mut QueryBuilder<'_, Postgres>);

    /// Bind every column value of `self`, in [`PgRecord::COLUMNS`] order
    fn push_values(&self, values: &mut Separated<'_, '_, Postgres, &'static str>) -> Result<()>;

    /// Push `column = <bind>` assignments for the supplied patch fields
    fn push_patch(patch: &Self::Patch, set: &mut Separated<'_, '_, Postgres, &'static str>)
        -> Result<()>;
}

/// Escape LIKE wildcards so the term is matched literally
fn contains_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// PostgreSQL repository for one record type
pub struct PgRepository<R> {
    pool: PgPool,
    _record: PhantomData<fn() -> R>,
}

impl<R: PgRecord> PgRepository<R> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _record: PhantomData,
        }
    }

    fn push_where(qb: &mut QueryBuilder<'_, Postgres>, params: &ListParams<R>) {
        qb.push(" WHERE TRUE");

        if let Some(term) = params.term() {
            qb.push(format_args!(" AND {} ILIKE ", R::SEARCH_COLUMN));
            qb.push_bind(contains_pattern(term));
        }

        R::push_filter(&params.filter, qb);
    }

    fn select_query(params: &ListParams<R>) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(format!("SELECT {} FROM {}", R::COLUMNS, R::TABLE));
        Self::push_where(&mut qb, params);
        qb.push(format_args!(
            " ORDER BY {} {}, id ASC LIMIT ",
            params.sort_by.column(),
            params.order.as_sql()
        ));
        qb.push_bind(params.limit);
        qb.push(" OFFSET ");
        qb.push_bind(params.offset);
        qb
    }

    fn count_query(params: &ListParams<R>) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", R::TABLE));
        Self::push_where(&mut qb, params);
        qb
    }

    /// `None` when the record type has no slug column
    fn find_one_query(lookup: &Lookup) -> Option<QueryBuilder<'static, Postgres>> {
        let column = match lookup {
            Lookup::Id(_) => "id",
            Lookup::Slug(_) => R::SLUG_COLUMN?,
        };

        let mut qb = QueryBuilder::new(format!(
            "SELECT {} FROM {} WHERE {} = ",
            R::COLUMNS,
            R::TABLE,
            column
        ));
        qb.push_bind(lookup.value().to_string());
        Some(qb)
    }

    fn insert_query(record: &R) -> Result<QueryBuilder<'static, Postgres>> {
        let mut qb = QueryBuilder::new(format!(
            "INSERT INTO {} ({}) VALUES (",
            R::TABLE,
            R::COLUMNS
        ));
        {
            let mut values = qb.separated(", ");
            record.push_values(&mut values)?;
        }
        qb.push(format_args!(") RETURNING {}", R::COLUMNS));
        Ok(qb)
    }

    fn update_query(
        id: &str,
        patch: &R::Patch,
        modified_at: DateTime<Utc>,
    ) -> Result<QueryBuilder<'static, Postgres>> {
        let mut qb = QueryBuilder::new(format!("UPDATE {} SET ", R::TABLE));
        {
            let mut set = qb.separated(", ");
            R::push_patch(patch, &mut set)?;
            set.push("modified_at = ");
            set.push_bind_unseparated(modified_at);
        }
        qb.push(" WHERE id = ");
        qb.push_bind(id.to_string());
        qb.push(format_args!(" RETURNING {}", R::COLUMNS));
        Ok(qb)
    }

    fn db_error(action: &str, e: sqlx::Error) -> AppError {
        tracing::error!("Failed to {} {}: {:?}", action, R::TABLE, e);
        AppError::from(e)
    }
}

#[async_trait]
impl<R: PgRecord> Repository<R> for PgRepository<R> {
    async fn find_many(&self, params: &ListParams<R>) -> Result<Vec<R>> {
        let mut qb = Self::select_query(params);

        let rows = qb
            .build_query_as::<R::Row>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Self::db_error("list", e))?;

        rows.into_iter().map(R::from_row).collect()
    }

    async fn count(&self, params: &ListParams<R>) -> Result<i64> {
        let mut qb = Self::count_query(params);

        qb.build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Self::db_error("count", e))
    }

    async fn find_one(&self, lookup: &Lookup) -> Result<Option<R>> {
        let Some(mut qb) = Self::find_one_query(lookup) else {
            return Ok(None);
        };

        let row = qb
            .build_query_as::<R::Row>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Self::db_error("get", e))?;

        row.map(R::from_row).transpose()
    }

    async fn insert(&self, record: R) -> Result<R> {
        let mut qb = Self::insert_query(&record)?;

        let row = qb
            .build_query_as::<R::Row>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Self::db_error("insert", e))?;

        R::from_row(row)
    }

    async fn update(
        &self,
        id: &str,
        patch: R::Patch,
        modified_at: DateTime<Utc>,
    ) -> Result<Option<R>> {
        let mut qb = Self::update_query(id, &patch, modified_at)?;

        let row = qb
            .build_query_as::<R::Row>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Self::db_error("update", e))?;

        row.map(R::from_row).transpose()
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", R::TABLE))
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::db_error("delete", e))?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::models::{Category, CategoryPatch, CategorySort};
    use crate::features::messages::models::{Message, MessageFilter, MessageSort, MessageStatus};
    use crate::features::products::models::{Product, ProductFilter, ProductSort};
    use crate::modules::catalog::SortOrder;
    use crate::shared::test_helpers::fixed_time;
    use crate::shared::types::Image;

    fn nails() -> Category {
        Category {
            id: "category-1".to_string(),
            name: "Nails".to_string(),
            description: String::new(),
            image: Image {
                src: "https://cdn.example.com/nails.png".to_string(),
                alt: "Nails".to_string(),
            },
            slug: "nails".to_string(),
            created_at: fixed_time(),
            modified_at: fixed_time(),
        }
    }

    fn placeholders(count: usize) -> String {
        (1..=count)
            .map(|n| format!("${}", n))
            .collect::<Vec<_>>()
            .join(", ")
    }

    #[test]
    fn test_select_query_sorts_with_id_tiebreak() {
        let params = ListParams::<Category>::new(CategorySort::CreatedAt, SortOrder::Desc)
            .page(20, 10);
        let qb = PgRepository::<Category>::select_query(&params);

        assert_eq!(
            qb.sql(),
            format!(
                "SELECT {} FROM categories WHERE TRUE ORDER BY created_at DESC, id ASC LIMIT $1 OFFSET $2",
                Category::COLUMNS
            )
        );
    }

    #[test]
    fn test_search_binds_term_before_filters() {
        let params = ListParams::<Message>::new(MessageSort::Name, SortOrder::Asc)
            .search(Some("  refund ".to_string()))
            .filter(MessageFilter {
                status: Some(MessageStatus::Unread),
            });

        let qb = PgRepository::<Message>::count_query(&params);
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM messages WHERE TRUE AND subject ILIKE $1 AND status = $2"
        );

        let qb = PgRepository::<Message>::select_query(&params);
        assert!(qb.sql().ends_with(
            "WHERE TRUE AND subject ILIKE $1 AND status = $2 ORDER BY name ASC, id ASC LIMIT $3 OFFSET $4"
        ));
    }

    #[test]
    fn test_blank_search_adds_no_predicate() {
        let params = ListParams::<Category>::new(CategorySort::Name, SortOrder::Asc)
            .search(Some("   ".to_string()));
        let qb = PgRepository::<Category>::count_query(&params);

        assert_eq!(qb.sql(), "SELECT COUNT(*) FROM categories WHERE TRUE");
    }

    #[test]
    fn test_product_filters() {
        let params = ListParams::<Product>::new(ProductSort::Price, SortOrder::Asc).filter(
            ProductFilter {
                category_id: Some("category-1".to_string()),
                has_variants: Some(true),
                has_promotion: Some(false),
            },
        );
        let qb = PgRepository::<Product>::count_query(&params);
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM products WHERE TRUE AND category_id = $1 \
             AND jsonb_array_length(variants) > 0 \
             AND NOT COALESCE((promotion->>'active')::boolean, FALSE)"
        );

        let params = ListParams::<Product>::new(ProductSort::Price, SortOrder::Asc).filter(
            ProductFilter {
                has_variants: Some(false),
                has_promotion: Some(true),
                ..Default::default()
            },
        );
        let qb = PgRepository::<Product>::count_query(&params);
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM products WHERE TRUE \
             AND jsonb_array_length(variants) = 0 \
             AND COALESCE((promotion->>'active')::boolean, FALSE)"
        );
    }

    #[test]
    fn test_find_one_query() {
        let qb = PgRepository::<Category>::find_one_query(&Lookup::Slug("nails".to_string()))
            .unwrap();
        assert_eq!(
            qb.sql(),
            format!("SELECT {} FROM categories WHERE slug = $1", Category::COLUMNS)
        );

        let qb =
            PgRepository::<Message>::find_one_query(&Lookup::Id("message-1".to_string())).unwrap();
        assert!(qb.sql().ends_with("FROM messages WHERE id = $1"));

        assert!(
            PgRepository::<Message>::find_one_query(&Lookup::Slug("hello".to_string())).is_none()
        );
    }

    #[test]
    fn test_insert_binds_one_value_per_column() {
        let qb = PgRepository::<Category>::insert_query(&nails()).unwrap();
        let columns = Category::COLUMNS.split(',').count();

        assert_eq!(
            qb.sql(),
            format!(
                "INSERT INTO categories ({cols}) VALUES ({}) RETURNING {cols}",
                placeholders(columns),
                cols = Category::COLUMNS
            )
        );
    }

    #[test]
    fn test_update_sets_patch_fields_then_modified_at() {
        let patch = CategoryPatch {
            name: Some("Nail Care".to_string()),
            slug: Some("nail-care".to_string()),
            ..Default::default()
        };
        let qb = PgRepository::<Category>::update_query("category-1", &patch, fixed_time())
            .unwrap();

        assert_eq!(
            qb.sql(),
            format!(
                "UPDATE categories SET name = $1, slug = $2, modified_at = $3 WHERE id = $4 RETURNING {}",
                Category::COLUMNS
            )
        );
    }

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("nail"), "%nail%");
        assert_eq!(contains_pattern("50%"), "%50\\%%");
        assert_eq!(contains_pattern("a_b"), "%a\\_b%");
        assert_eq!(contains_pattern("c:\\"), "%c:\\\\%");
    }
}
