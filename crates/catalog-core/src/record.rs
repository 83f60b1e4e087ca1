//! Record abstraction shared by every store kind

use crate::RecordId;
use chrono::{DateTime, Utc};

/// A kind of record the indexed store can hold.
///
/// Implementations describe which fields are uniquely indexed and how drafts
/// and patches turn into stored values; the store owns ids, timestamps and
/// index bookkeeping.
pub trait Record: Clone + Send + Sync + 'static {
    /// Fields supplied on create
    type Draft: Send + 'static;
    /// Partial fields supplied on update
    type Patch: Send + 'static;

    /// Name used in error reports
    const KIND: &'static str;

    /// Uniquely indexed fields, in the order conflicts are reported.
    const UNIQUE_FIELDS: &'static [&'static str] = &[];

    fn build(id: RecordId, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    fn id(&self) -> RecordId;

    /// Raw value of a uniquely indexed field, `None` for any other name.
    fn unique_value(&self, _field: &str) -> Option<&str> {
        None
    }

    fn apply(&mut self, patch: Self::Patch);

    fn touch(&mut self, now: DateTime<Utc>);
}

/// Records restricted to the user who created them
pub trait Owned: Record {
    fn owner_id(&self) -> RecordId;
}

/// Index key for a uniquely indexed value.
pub fn normalize_key(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_ignore_case_and_padding() {
        assert_eq!(normalize_key("  A@X.com "), "a@x.com");
        assert_eq!(normalize_key("Alice"), normalize_key("alice"));
    }
}
