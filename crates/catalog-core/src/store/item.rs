//! Item records, owned by the user who created them

use super::IndexedStore;
use crate::ports::RecordFilter;
use crate::record::{Owned, Record};
use crate::{Item, ItemStatus, ItemUpdate, NewItem, RecordId};
use chrono::{DateTime, Utc};

/// Items have no unique fields; access is owner-scoped
pub type ItemStore = IndexedStore<Item>;

impl Record for Item {
    type Draft = NewItem;
    type Patch = ItemUpdate;

    const KIND: &'static str = "item";

    fn build(id: RecordId, draft: NewItem, now: DateTime<Utc>) -> Self {
        Item {
            id,
            title: draft.title,
            description: draft.description,
            price: draft.price,
            status: draft.status,
            owner_id: draft.owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn apply(&mut self, patch: ItemUpdate) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

impl Owned for Item {
    fn owner_id(&self) -> RecordId {
        self.owner_id
    }
}

/// Optional owner and status constraints; unset fields match anything
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemFilter {
    pub owner_id: Option<RecordId>,
    pub status: Option<ItemStatus>,
}

impl ItemFilter {
    pub fn owned_by(owner_id: RecordId) -> Self {
        Self {
            owner_id: Some(owner_id),
            status: None,
        }
    }

    pub fn with_status(mut self, status: Option<ItemStatus>) -> Self {
        self.status = status;
        self
    }
}

impl RecordFilter<Item> for ItemFilter {
    fn matches(&self, item: &Item) -> bool {
        self.owner_id.map_or(true, |owner| item.owner_id == owner)
            && self.status.map_or(true, |status| item.status == status)
    }
}
