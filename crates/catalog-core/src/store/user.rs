//! User records and the credential projection used by login

use super::IndexedStore;
use crate::error::StoreResult;
use crate::ports::RecordStore;
use crate::record::Record;
use crate::{NewUser, RecordId, User, UserUpdate};
use chrono::{DateTime, Utc};

/// Users, uniquely indexed by email and username
pub type UserStore = IndexedStore<User>;

impl Record for User {
    type Draft = NewUser;
    type Patch = UserUpdate;

    const KIND: &'static str = "user";
    const UNIQUE_FIELDS: &'static [&'static str] = &["email", "username"];

    fn build(id: RecordId, draft: NewUser, now: DateTime<Utc>) -> Self {
        User {
            id,
            email: draft.email,
            username: draft.username,
            full_name: draft.full_name,
            hashed_password: draft.hashed_password,
            is_active: draft.is_active,
            is_superuser: draft.is_superuser,
            created_at: now,
            updated_at: now,
        }
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn unique_value(&self, field: &str) -> Option<&str> {
        match field {
            "email" => Some(self.email.as_str()),
            "username" => Some(self.username.as_str()),
            _ => None,
        }
    }

    fn apply(&mut self, patch: UserUpdate) {
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(username) = patch.username {
            self.username = username;
        }
        if let Some(full_name) = patch.full_name {
            self.full_name = full_name;
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
        if let Some(is_superuser) = patch.is_superuser {
            self.is_superuser = is_superuser;
        }
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

/// What the password check needs to know about a user, and nothing more
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user_id: RecordId,
    pub hashed_password: String,
    pub is_active: bool,
}

/// Resolve a login name to its stored credentials.
///
/// The store does not hash or compare passwords; the caller verifies
/// `hashed_password` with its own hasher.
pub async fn lookup_credentials<S>(store: &S, username: &str) -> StoreResult<Credentials>
where
    S: RecordStore<User> + ?Sized,
{
    let user = store.get_by_unique_field("username", username).await?;
    Ok(Credentials {
        user_id: user.id,
        hashed_password: user.hashed_password,
        is_active: user.is_active,
    })
}
