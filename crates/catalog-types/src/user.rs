//! User types

use crate::RecordId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User account as held by the store.
///
/// The password hash travels with the record so the credential check can
/// read it, but it is never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    pub email: String,
    pub username: String,
    pub full_name: Option<String>,
    #[serde(skip_serializing, default)]
    pub hashed_password: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields of a user that does not exist yet. The store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub full_name: Option<String>,
    pub hashed_password: String,
    pub is_active: bool,
    pub is_superuser: bool,
}

impl NewUser {
    pub fn new(
        email: impl Into<String>,
        username: impl Into<String>,
        hashed_password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            username: username.into(),
            full_name: None,
            hashed_password: hashed_password.into(),
            is_active: true,
            is_superuser: false,
        }
    }
}

/// Partial user update; an absent field is left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    /// `Some(None)` clears the name
    #[serde(
        default,
        deserialize_with = "crate::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub full_name: Option<Option<String>>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub is_superuser: Option<bool>,
}

/// User registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub password: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// User login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserLogin {
    pub username: String,
    pub password: String,
}

/// Bearer token handed out after a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
    /// Seconds until the token expires
    pub expires_in: i64,
}

impl Token {
    pub fn bearer(access_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            expires_in,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_is_not_serialized() {
        let now = Utc::now();
        let user = User {
            id: 7,
            email: "a@x.com".into(),
            username: "a".into(),
            full_name: None,
            hashed_password: "$argon2id$secret".into(),
            is_active: true,
            is_superuser: false,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("hashed_password").is_none());
        assert_eq!(json["id"], 7);
    }

    #[test]
    fn registration_defaults_to_active() {
        let req: UserCreate = serde_json::from_str(
            r#"{"email":"a@x.com","username":"alice","password":"Secret123"}"#,
        )
        .unwrap();
        assert!(req.is_active);
        assert!(req.full_name.is_none());
    }

    #[test]
    fn update_tells_null_from_absent() {
        let absent: UserUpdate = serde_json::from_str(r#"{"email":"a@x.com"}"#).unwrap();
        assert_eq!(absent.full_name, None);

        let cleared: UserUpdate = serde_json::from_str(r#"{"full_name":null}"#).unwrap();
        assert_eq!(cleared.full_name, Some(None));

        let set: UserUpdate = serde_json::from_str(r#"{"full_name":"New"}"#).unwrap();
        assert_eq!(set.full_name, Some(Some("New".to_string())));
    }
}
