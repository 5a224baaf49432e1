use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::core::error::{AppError, Result};
use crate::modules::catalog::{ListParams, Lookup, Record, Repository};

/// In-process repository with the same query semantics as the SQL backend
pub struct MemoryRepository<R: Record> {
    records: RwLock<Vec<R>>,
}

impl<R: Record> Default for MemoryRepository<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> MemoryRepository<R> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    pub fn with_records(records: Vec<R>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    fn selected<'a>(records: &'a [R], params: &'a ListParams<R>) -> impl Iterator<Item = &'a R> {
        records
            .iter()
            .filter(move |r| r.matches(&params.filter) && params.matches_term(r.search_text()))
    }

    /// Id and slug must stay unique across the table
    fn check_unique(records: &[R], candidate: &R) -> Result<()> {
        for other in records.iter().filter(|r| r.id() != candidate.id()) {
            if let (Some(a), Some(b)) = (other.slug(), candidate.slug()) {
                if a == b {
                    return Err(AppError::Conflict(format!(
                        "{} with slug '{}' already exists",
                        R::KIND.label(),
                        b
                    )));
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<R: Record> Repository<R> for MemoryRepository<R> {
    async fn find_many(&self, params: &ListParams<R>) -> Result<Vec<R>> {
        let records = self.records.read().await;

        let mut matched: Vec<&R> = Self::selected(&records, params).collect();
        matched.sort_by(|a, b| {
            params
                .order
                .apply(a.compare(b, params.sort_by))
                .then_with(|| a.id().cmp(b.id()))
        });

        Ok(matched
            .into_iter()
            .skip(params.offset.max(0) as usize)
            .take(params.limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn count(&self, params: &ListParams<R>) -> Result<i64> {
        let records = self.records.read().await;
        Ok(Self::selected(&records, params).count() as i64)
    }

    async fn find_one(&self, lookup: &Lookup) -> Result<Option<R>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| lookup.matches(*r)).cloned())
    }

    async fn insert(&self, record: R) -> Result<R> {
        let mut records = self.records.write().await;

        if records.iter().any(|r| r.id() == record.id()) {
            return Err(AppError::Conflict(format!(
                "{} '{}' already exists",
                R::KIND.label(),
                record.id()
            )));
        }
        Self::check_unique(&records, &record)?;

        records.push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        id: &str,
        patch: R::Patch,
        modified_at: DateTime<Utc>,
    ) -> Result<Option<R>> {
        let mut records = self.records.write().await;

        let Some(index) = records.iter().position(|r| r.id() == id) else {
            return Ok(None);
        };

        let mut updated = records[index].clone();
        updated.apply(patch, modified_at);
        Self::check_unique(&records, &updated)?;

        records[index] = updated.clone();
        Ok(Some(updated))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut records = self.records.write().await;

        match records.iter().position(|r| r.id() == id) {
            Some(index) => {
                records.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
