//! Port traits (interfaces) the HTTP layer programs against

pub mod storage;

pub use storage::{AllRecords, OwnedRecordStore, RecordFilter, RecordStore};
