//! Error types for the record store

use crate::RecordId;
use thiserror::Error;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Why a store operation was refused. None of these mutate the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No live record at that id or index key
    #[error("{kind} not found: {key}")]
    NotFound { kind: &'static str, key: String },

    /// A uniquely indexed field is already held by another record
    #[error("{kind} {field} already exists")]
    Duplicate {
        kind: &'static str,
        field: &'static str,
    },

    /// The acting user does not own the record
    #[error("not enough permissions on {kind} {id}")]
    Forbidden { kind: &'static str, id: RecordId },
}

impl StoreError {
    pub fn not_found(kind: &'static str, key: impl ToString) -> Self {
        StoreError::NotFound {
            kind,
            key: key.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    /// Field name for `Duplicate`, `None` otherwise
    pub fn duplicate_field(&self) -> Option<&'static str> {
        match self {
            StoreError::Duplicate { field, .. } => Some(field),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_record() {
        assert_eq!(
            StoreError::not_found("user", 3).to_string(),
            "user not found: 3"
        );
        assert_eq!(
            StoreError::Duplicate {
                kind: "user",
                field: "email"
            }
            .to_string(),
            "user email already exists"
        );
        assert_eq!(
            StoreError::Forbidden { kind: "item", id: 9 }.to_string(),
            "not enough permissions on item 9"
        );
    }

    #[test]
    fn duplicate_field_only_for_duplicates() {
        let dup = StoreError::Duplicate {
            kind: "user",
            field: "username",
        };
        assert_eq!(dup.duplicate_field(), Some("username"));
        assert!(StoreError::not_found("item", 1).duplicate_field().is_none());
        assert!(StoreError::not_found("item", 1).is_not_found());
    }
}
