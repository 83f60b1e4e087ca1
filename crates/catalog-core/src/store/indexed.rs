//! Generic in-memory store with uniqueness indexes

use crate::error::{StoreError, StoreResult};
use crate::ports::{OwnedRecordStore, RecordFilter, RecordStore};
use crate::record::{normalize_key, Owned, Record};
use crate::{Page, RecordId};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use tracing::debug;

/// All records of one kind, their uniqueness indexes and the sequence counter.
///
/// One lock guards everything, so a mutation is observed either entirely or
/// not at all. Ids come from a counter that only moves forward; since the
/// primary map is ordered by id, iteration order is insertion order.
pub struct IndexedStore<R: Record> {
    state: RwLock<StoreState<R>>,
}

struct StoreState<R: Record> {
    records: BTreeMap<RecordId, R>,
    indexes: HashMap<&'static str, HashMap<String, RecordId>>,
    next_id: RecordId,
}

impl<R: Record> StoreState<R> {
    fn new() -> Self {
        Self {
            records: BTreeMap::new(),
            indexes: R::UNIQUE_FIELDS
                .iter()
                .map(|field| (*field, HashMap::new()))
                .collect(),
            next_id: 1,
        }
    }

    /// First unique field of `candidate` already held by a record other than `ignore`.
    fn conflict(&self, candidate: &R, ignore: Option<RecordId>) -> Option<&'static str> {
        R::UNIQUE_FIELDS.iter().copied().find(|field| {
            let Some(value) = candidate.unique_value(field) else {
                return false;
            };
            self.indexes
                .get(field)
                .and_then(|index| index.get(&normalize_key(value)))
                .is_some_and(|holder| Some(*holder) != ignore)
        })
    }

    fn index(&mut self, record: &R) {
        for field in R::UNIQUE_FIELDS {
            if let (Some(value), Some(index)) =
                (record.unique_value(field), self.indexes.get_mut(field))
            {
                index.insert(normalize_key(value), record.id());
            }
        }
    }

    fn unindex(&mut self, record: &R) {
        for field in R::UNIQUE_FIELDS {
            if let (Some(value), Some(index)) =
                (record.unique_value(field), self.indexes.get_mut(field))
            {
                let key = normalize_key(value);
                if index.get(&key) == Some(&record.id()) {
                    index.remove(&key);
                }
            }
        }
    }

    fn get(&self, id: RecordId) -> StoreResult<&R> {
        self.records
            .get(&id)
            .ok_or_else(|| StoreError::not_found(R::KIND, id))
    }
}

impl<R: Record> IndexedStore<R> {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState::new()),
        }
    }

    /// Number of live records
    pub async fn len(&self) -> usize {
        self.state.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.records.is_empty()
    }

    async fn get_checked<F>(&self, id: RecordId, check: F) -> StoreResult<R>
    where
        F: FnOnce(&R) -> StoreResult<()> + Send,
    {
        let state = self.state.read().await;
        let record = state.get(id)?;
        check(record)?;
        Ok(record.clone())
    }

    /// Update under the write lock after `check` accepts the current record.
    async fn update_checked<F>(&self, id: RecordId, patch: R::Patch, check: F) -> StoreResult<R>
    where
        F: FnOnce(&R) -> StoreResult<()> + Send,
    {
        let mut state = self.state.write().await;
        let current = state.get(id)?;
        check(current)?;

        let mut updated = current.clone();
        updated.apply(patch);
        if let Some(field) = state.conflict(&updated, Some(id)) {
            debug!(kind = R::KIND, id, field, "Update rejected: duplicate key");
            return Err(StoreError::Duplicate {
                kind: R::KIND,
                field,
            });
        }
        updated.touch(Utc::now());

        if let Some(previous) = state.records.insert(id, updated.clone()) {
            state.unindex(&previous);
        }
        state.index(&updated);
        debug!(kind = R::KIND, id, "Record updated");
        Ok(updated)
    }

    async fn delete_checked<F>(&self, id: RecordId, check: F) -> StoreResult<()>
    where
        F: FnOnce(&R) -> StoreResult<()> + Send,
    {
        let mut state = self.state.write().await;
        check(state.get(id)?)?;

        if let Some(removed) = state.records.remove(&id) {
            state.unindex(&removed);
        }
        debug!(kind = R::KIND, id, "Record deleted");
        Ok(())
    }
}

impl<R: Record> Default for IndexedStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> std::fmt::Debug for IndexedStore<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexedStore").field("kind", &R::KIND).finish()
    }
}

#[async_trait]
impl<R: Record> RecordStore<R> for IndexedStore<R> {
    async fn create(&self, draft: R::Draft) -> StoreResult<R> {
        let mut state = self.state.write().await;
        let id = state.next_id;
        let record = R::build(id, draft, Utc::now());

        if let Some(field) = state.conflict(&record, None) {
            debug!(kind = R::KIND, field, "Create rejected: duplicate key");
            return Err(StoreError::Duplicate {
                kind: R::KIND,
                field,
            });
        }

        state.next_id += 1;
        state.index(&record);
        state.records.insert(id, record.clone());
        debug!(kind = R::KIND, id, "Record created");
        Ok(record)
    }

    async fn get_by_id(&self, id: RecordId) -> StoreResult<R> {
        self.get_checked(id, |_| Ok(())).await
    }

    async fn get_by_unique_field(&self, field: &str, value: &str) -> StoreResult<R> {
        let state = self.state.read().await;
        let key = normalize_key(value);
        state
            .indexes
            .get(field)
            .and_then(|index| index.get(&key))
            .and_then(|id| state.records.get(id))
            .cloned()
            .ok_or_else(|| StoreError::not_found(R::KIND, format!("{field}={value}")))
    }

    async fn list(&self, filter: &dyn RecordFilter<R>, page: Page) -> Vec<R> {
        let state = self.state.read().await;
        state
            .records
            .values()
            .filter(|record| filter.matches(record))
            .skip(page.skip)
            .take(page.limit)
            .cloned()
            .collect()
    }

    async fn count(&self, filter: &dyn RecordFilter<R>) -> usize {
        let state = self.state.read().await;
        state
            .records
            .values()
            .filter(|record| filter.matches(record))
            .count()
    }

    async fn update(&self, id: RecordId, patch: R::Patch) -> StoreResult<R> {
        self.update_checked(id, patch, |_| Ok(())).await
    }

    async fn delete(&self, id: RecordId) -> StoreResult<()> {
        self.delete_checked(id, |_| Ok(())).await
    }
}

fn ensure_owner<R: Owned>(record: &R, actor: RecordId) -> StoreResult<()> {
    if record.owner_id() == actor {
        Ok(())
    } else {
        Err(StoreError::Forbidden {
            kind: R::KIND,
            id: record.id(),
        })
    }
}

#[async_trait]
impl<R: Owned> OwnedRecordStore<R> for IndexedStore<R> {
    async fn get_owned(&self, id: RecordId, actor: RecordId) -> StoreResult<R> {
        self.get_checked(id, |record| ensure_owner(record, actor))
            .await
    }

    async fn update_owned(
        &self,
        id: RecordId,
        patch: R::Patch,
        actor: RecordId,
    ) -> StoreResult<R> {
        self.update_checked(id, patch, |record| ensure_owner(record, actor))
            .await
    }

    async fn delete_owned(&self, id: RecordId, actor: RecordId) -> StoreResult<()> {
        self.delete_checked(id, |record| ensure_owner(record, actor))
            .await
    }
}
