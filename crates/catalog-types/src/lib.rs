//! Catalog Types - Pure data definitions
//!
//! Records, drafts, patches and request/response schemas shared by the
//! store and the HTTP service. No runtime dependencies beyond serde/chrono.

pub mod item;
pub mod user;

pub use item::*;
pub use user::*;

use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize a patch field where an explicit `null` means "clear it".
///
/// Used with `#[serde(default)]`: an absent field stays `None`, `null`
/// becomes `Some(None)` and a value becomes `Some(Some(v))`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Identifier assigned by a store's sequence counter. Starts at 1.
pub type RecordId = u64;

/// A window over an insertion-ordered listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub skip: usize,
    pub limit: usize,
}

impl Page {
    pub fn new(skip: usize, limit: usize) -> Self {
        Self { skip, limit }
    }

    /// Build a window from a 1-based page number and page size.
    ///
    /// A page number of zero is treated as the first page.
    pub fn numbered(page: usize, size: usize) -> Self {
        Self {
            skip: page.saturating_sub(1).saturating_mul(size),
            limit: size,
        }
    }

    /// Number of pages needed to show `total` records, never less than one.
    pub fn page_count(total: usize, size: usize) -> usize {
        if total == 0 || size == 0 {
            1
        } else {
            total.div_ceil(size)
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self { skip: 0, limit: 100 }
    }
}
