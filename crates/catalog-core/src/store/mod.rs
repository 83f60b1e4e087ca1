//! In-memory record stores

pub mod indexed;
pub mod item;
pub mod user;

pub use indexed::IndexedStore;
pub use item::{ItemFilter, ItemStore};
pub use user::{lookup_credentials, Credentials, UserStore};
