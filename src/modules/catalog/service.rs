use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use tracing::{debug, info};

use crate::core::error::{AppError, Result};
use crate::modules::catalog::{ListParams, Lookup, Page, Record, Repository, SortField};

/// Server-assigned fields handed to a record constructor on add
#[derive(Debug, Clone)]
pub struct NewRecordMeta {
    pub id: String,
    pub created_at: DateTime<Utc>,
}

/// Catalog query service for one record type
pub struct CatalogService<R: Record> {
    repo: Arc<dyn Repository<R>>,
}

impl<R: Record> Clone for CatalogService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
        }
    }
}

/// Timestamps are kept at microsecond precision, matching TIMESTAMPTZ
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

impl<R: Record> CatalogService<R> {
    pub fn new(repo: Arc<dyn Repository<R>>) -> Self {
        Self { repo }
    }

    /// List a page of records plus the total number of matches
    pub async fn list(&self, params: &ListParams<R>) -> Result<Page<R>> {
        params.validate()?;

        let mut params = params.clone();
        params.limit = params.effective_limit();

        let (items, total) =
            futures::try_join!(self.repo.find_many(&params), self.repo.count(&params))?;

        debug!(
            kind = %R::KIND,
            offset = params.offset,
            limit = params.limit,
            sort_by = params.sort_by.as_str(),
            returned = items.len(),
            total,
            "Listed records"
        );

        Ok(Page { total, items })
    }

    /// Get a single record by id or slug
    pub async fn get(&self, lookup: &Lookup) -> Result<R> {
        if matches!(lookup, Lookup::Slug(_)) && !R::HAS_SLUG {
            return Err(AppError::Validation(format!(
                "{} records cannot be looked up by slug",
                R::KIND.label()
            )));
        }

        self.repo
            .find_one(lookup)
            .await?
            .ok_or_else(|| Self::not_found(lookup.value()))
    }

    /// Insert a new record built from server-assigned id and timestamps
    pub async fn add<F>(&self, build: F) -> Result<R>
    where
        F: FnOnce(NewRecordMeta) -> R + Send,
    {
        let meta = NewRecordMeta {
            id: R::KIND.new_id(),
            created_at: now(),
        };

        let record = self.repo.insert(build(meta)).await?;
        info!(kind = %R::KIND, id = record.id(), "Record created");

        Ok(record)
    }

    /// Apply a partial update; an empty patch returns the record untouched
    pub async fn update(&self, id: &str, patch: R::Patch) -> Result<R> {
        if R::patch_is_empty(&patch) {
            return self.get(&Lookup::Id(id.to_string())).await;
        }

        let record = self
            .repo
            .update(id, patch, now())
            .await?
            .ok_or_else(|| Self::not_found(id))?;
        info!(kind = %R::KIND, id, "Record updated");

        Ok(record)
    }

    /// Permanently delete a record
    pub async fn remove(&self, id: &str) -> Result<()> {
        if !self.repo.delete(id).await? {
            return Err(Self::not_found(id));
        }
        info!(kind = %R::KIND, id, "Record deleted");

        Ok(())
    }

    fn not_found(key: &str) -> AppError {
        AppError::NotFound(format!("{} '{}' not found", R::KIND.label(), key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::catalog::{MemoryRepository, SortOrder};
    use crate::shared::test_helpers::{fixed_time, widget, Widget, WidgetPatch, WidgetSort};

    fn service() -> CatalogService<Widget> {
        CatalogService::new(Arc::new(MemoryRepository::with_records(vec![
            widget("widget-1", "Nails", 3),
            widget("widget-2", "Lips", 2),
            widget("widget-3", "Eyes", 1),
        ])))
    }

    #[tokio::test]
    async fn test_list_returns_page_and_total() {
        let service = service();
        let params = ListParams::<Widget>::new(WidgetSort::Name, SortOrder::Asc).page(0, 7);

        let page = service.list(&params).await.unwrap();
        let names: Vec<_> = page.items.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["Eyes", "Lips", "Nails"]);
        assert_eq!(page.total, 3);
    }

    #[tokio::test]
    async fn test_list_rejects_bad_paging() {
        let service = service();

        let params = ListParams::<Widget>::new(WidgetSort::Name, SortOrder::Asc).page(-1, 10);
        assert!(matches!(
            service.list(&params).await,
            Err(AppError::Validation(_))
        ));

        let params = ListParams::<Widget>::new(WidgetSort::Name, SortOrder::Asc).page(0, 0);
        assert!(matches!(
            service.list(&params).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_list_clamps_limit() {
        let service = CatalogService::<Widget>::new(Arc::new(MemoryRepository::with_records(
            (0..150)
                .map(|i| widget(&format!("widget-{:03}", i), &format!("W{:03}", i), i))
                .collect(),
        )));
        let params = ListParams::<Widget>::new(WidgetSort::Name, SortOrder::Asc).page(0, 500);

        let page = service.list(&params).await.unwrap();
        assert_eq!(page.items.len(), 100);
        assert_eq!(page.total, 150);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let err = service()
            .get(&Lookup::Id("missing".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_add_assigns_id_and_timestamp() {
        let service = service();
        let created = service
            .add(|meta| Widget {
                id: meta.id,
                name: "Brows".to_string(),
                slug: "brows".to_string(),
                weight: 4,
                modified_at: meta.created_at,
            })
            .await
            .unwrap();

        assert!(created.id.starts_with("category-"));
        let fetched = service.get(&Lookup::Id(created.id.clone())).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_empty_update_leaves_record_untouched() {
        let service = service();
        let updated = service
            .update("widget-1", WidgetPatch::default())
            .await
            .unwrap();

        assert_eq!(updated, widget("widget-1", "Nails", 3));
        assert_eq!(updated.modified_at, fixed_time());
    }

    #[tokio::test]
    async fn test_update_refreshes_modified_at() {
        let service = service();
        let updated = service
            .update(
                "widget-1",
                WidgetPatch {
                    weight: Some(9),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.weight, 9);
        assert_eq!(updated.name, "Nails");
        assert!(updated.modified_at > fixed_time());
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let err = service()
            .update(
                "missing",
                WidgetPatch {
                    weight: Some(1),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_remove_then_get_is_not_found() {
        let service = service();
        service.remove("widget-2").await.unwrap();

        let err = service
            .get(&Lookup::Id("widget-2".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = service.remove("widget-2").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
