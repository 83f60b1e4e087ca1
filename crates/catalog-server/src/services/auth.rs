//! Authentication service

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use catalog_core::{
    lookup_credentials, NewUser, RecordId, RecordStore, StoreError, Token, User, UserCreate,
    UserStore,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("incorrect username or password")]
    InvalidCredentials,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("token encoding failed: {0}")]
    Token(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type AuthResult<T> = Result<T, AuthError>;

pub struct AuthService {
    users: Arc<UserStore>,
    jwt_secret: String,
    token_ttl: Duration,
    argon2: Argon2<'static>,
}

impl AuthService {
    pub fn with_argon2(
        users: Arc<UserStore>,
        jwt_secret: String,
        token_ttl_minutes: i64,
        argon2: Argon2<'static>,
    ) -> Self {
        Self {
            users,
            jwt_secret,
            token_ttl: Duration::minutes(token_ttl_minutes),
            argon2,
        }
    }

    pub fn hash_password(&self, password: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    fn verify_password(&self, password: &str, hashed: &str) -> bool {
        PasswordHash::new(hashed)
            .map(|parsed| {
                self.argon2
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    /// Create a regular account from an already validated request.
    pub async fn register(&self, req: UserCreate) -> AuthResult<User> {
        let hashed = self.hash_password(&req.password)?;
        let mut draft = NewUser::new(req.email, req.username, hashed);
        draft.full_name = req.full_name;
        draft.is_active = req.is_active;

        let user = self.users.create(draft).await?;
        info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user)
    }

    pub async fn create_superuser(
        &self,
        email: &str,
        username: &str,
        full_name: Option<&str>,
        password: &str,
    ) -> AuthResult<User> {
        let mut draft = NewUser::new(email, username, self.hash_password(password)?);
        draft.full_name = full_name.map(str::to_string);
        draft.is_superuser = true;
        Ok(self.users.create(draft).await?)
    }

    /// Check a username and password, returning the user id.
    ///
    /// Unknown users, wrong passwords and inactive accounts all fail the same way.
    pub async fn authenticate(&self, username: &str, password: &str) -> AuthResult<RecordId> {
        let creds = match lookup_credentials(self.users.as_ref(), username).await {
            Ok(creds) => creds,
            Err(e) if e.is_not_found() => return Err(AuthError::InvalidCredentials),
            Err(e) => return Err(e.into()),
        };

        if !creds.is_active || !self.verify_password(password, &creds.hashed_password) {
            debug!(username, "Authentication failed");
            return Err(AuthError::InvalidCredentials);
        }
        Ok(creds.user_id)
    }

    pub fn issue_token(&self, user_id: RecordId) -> AuthResult<Token> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + self.token_ttl).timestamp(),
            iat: now.timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::Token(e.to_string()))?;

        Ok(Token::bearer(access_token, self.token_ttl.num_seconds()))
    }

    pub fn validate_token(&self, token: &str) -> AuthResult<RecordId> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        token_data
            .claims
            .sub
            .parse()
            .map_err(|_| AuthError::InvalidToken("subject is not a user id".to_string()))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // user id
    exp: i64,
    iat: i64,
}

#[cfg(test)]
pub(crate) fn fast_argon2() -> Argon2<'static> {
    use argon2::{Algorithm, Params, Version};
    let params = Params::new(8, 1, 1, None).expect("valid argon2 params");
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn service(ttl_minutes: i64) -> AuthService {
        AuthService::with_argon2(
            Arc::new(UserStore::new()),
            "test-secret".to_string(),
            ttl_minutes,
            fast_argon2(),
        )
    }

    fn signup(username: &str) -> UserCreate {
        UserCreate {
            email: format!("{username}@example.com"),
            username: username.to_string(),
            full_name: None,
            password: "Secret123".to_string(),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_register_then_authenticate() {
        let auth = service(30);
        let user = assert_ok!(auth.register(signup("alice")).await);
        assert_ne!(user.hashed_password, "Secret123");
        assert!(!user.is_superuser);

        let id = assert_ok!(auth.authenticate("alice", "Secret123").await);
        assert_eq!(id, user.id);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_look_the_same() {
        let auth = service(30);
        assert_ok!(auth.register(signup("alice")).await);

        let wrong = assert_err!(auth.authenticate("alice", "Wrong1234").await);
        assert!(matches!(wrong, AuthError::InvalidCredentials));
        let unknown = assert_err!(auth.authenticate("bob", "Secret123").await);
        assert!(matches!(unknown, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_inactive_user_cannot_authenticate() {
        let auth = service(30);
        let mut req = signup("carol");
        req.is_active = false;
        assert_ok!(auth.register(req).await);

        let err = assert_err!(auth.authenticate("carol", "Secret123").await);
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_duplicate_registration_surfaces_store_error() {
        let auth = service(30);
        assert_ok!(auth.register(signup("alice")).await);
        let err = assert_err!(auth.register(signup("alice")).await);
        assert!(matches!(
            err,
            AuthError::Store(StoreError::Duplicate { field: "email", .. })
        ));
    }

    #[test]
    fn test_token_round_trip() {
        let auth = service(30);
        let token = assert_ok!(auth.issue_token(42));
        assert_eq!(token.token_type, "bearer");
        assert_eq!(token.expires_in, 30 * 60);
        assert_eq!(assert_ok!(auth.validate_token(&token.access_token)), 42);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let auth = service(-10);
        let token = assert_ok!(auth.issue_token(1));
        assert_err!(auth.validate_token(&token.access_token));
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let issuer = service(30);
        let token = assert_ok!(issuer.issue_token(1));
        let other = AuthService::with_argon2(
            Arc::new(UserStore::new()),
            "other-secret".to_string(),
            30,
            fast_argon2(),
        );
        assert_err!(other.validate_token(&token.access_token));
        assert_err!(other.validate_token("not-a-jwt"));
    }
}
