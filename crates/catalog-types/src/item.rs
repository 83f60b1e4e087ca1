//! Item types

use crate::RecordId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Item status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[default]
    Active,
    Inactive,
    Archived,
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemStatus::Active => write!(f, "active"),
            ItemStatus::Inactive => write!(f, "inactive"),
            ItemStatus::Archived => write!(f, "archived"),
        }
    }
}

/// An item owned by the user who created it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: RecordId,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub status: ItemStatus,
    pub owner_id: RecordId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields of an item that does not exist yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub status: ItemStatus,
    pub owner_id: RecordId,
}

/// Item creation request; the owner comes from the authenticated caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCreate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub status: ItemStatus,
}

impl ItemCreate {
    pub fn owned_by(self, owner_id: RecordId) -> NewItem {
        NewItem {
            title: self.title,
            description: self.description,
            price: self.price,
            status: self.status,
            owner_id,
        }
    }
}

/// Partial item update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemUpdate {
    #[serde(default)]
    pub title: Option<String>,
    /// `Some(None)` clears the description
    #[serde(
        default,
        deserialize_with = "crate::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub status: Option<ItemStatus>,
}

impl ItemUpdate {
    pub fn status(status: ItemStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// Paginated item listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemList {
    pub items: Vec<Item>,
    pub total: usize,
    pub page: usize,
    pub size: usize,
    pub pages: usize,
}
