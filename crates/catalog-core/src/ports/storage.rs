//! Storage traits for record collections

use crate::record::{Owned, Record};
use crate::{Page, RecordId, StoreResult};
use async_trait::async_trait;

/// Predicate used by `list` and `count`
pub trait RecordFilter<R>: Send + Sync {
    fn matches(&self, record: &R) -> bool;
}

impl<R, F> RecordFilter<R> for F
where
    F: Fn(&R) -> bool + Send + Sync,
{
    fn matches(&self, record: &R) -> bool {
        self(record)
    }
}

/// Matches every record
#[derive(Debug, Clone, Copy, Default)]
pub struct AllRecords;

impl<R> RecordFilter<R> for AllRecords {
    fn matches(&self, _record: &R) -> bool {
        true
    }
}

/// Record store
///
/// Every mutating call either fully applies or returns an error and leaves
/// the store untouched.
#[async_trait]
pub trait RecordStore<R: Record>: Send + Sync {
    /// Insert a new record, assigning the next sequence id.
    async fn create(&self, draft: R::Draft) -> StoreResult<R>;

    async fn get_by_id(&self, id: RecordId) -> StoreResult<R>;

    /// Look a record up through one of its uniqueness indexes.
    async fn get_by_unique_field(&self, field: &str, value: &str) -> StoreResult<R>;

    /// Insertion-ordered slice of the records matching `filter`.
    async fn list(&self, filter: &dyn RecordFilter<R>, page: Page) -> Vec<R>;

    async fn count(&self, filter: &dyn RecordFilter<R>) -> usize;

    async fn update(&self, id: RecordId, patch: R::Patch) -> StoreResult<R>;

    async fn delete(&self, id: RecordId) -> StoreResult<()>;
}

/// Owner-scoped access. A record owned by someone else is reported as
/// `Forbidden`, never silently skipped.
#[async_trait]
pub trait OwnedRecordStore<R: Owned>: RecordStore<R> {
    async fn get_owned(&self, id: RecordId, actor: RecordId) -> StoreResult<R>;

    async fn update_owned(&self, id: RecordId, patch: R::Patch, actor: RecordId)
        -> StoreResult<R>;

    async fn delete_owned(&self, id: RecordId, actor: RecordId) -> StoreResult<()>;
}
