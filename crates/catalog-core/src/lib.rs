//! Catalog Core Library
//!
//! The indexed record store: in-memory collections keyed by a sequence id,
//! with uniqueness indexes and owner-scoped access, plus the port traits the
//! HTTP layer programs against.

// Re-export pure types from catalog-types
pub use catalog_types::*;

pub mod error;
pub mod ports;
pub mod record;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use ports::{AllRecords, OwnedRecordStore, RecordFilter, RecordStore};
pub use record::{Owned, Record};
pub use store::{lookup_credentials, Credentials, IndexedStore, ItemFilter, ItemStore, UserStore};
