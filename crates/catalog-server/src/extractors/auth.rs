//! Auth extractors for protected routes

use crate::error::ApiError;
use crate::AppState;
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use catalog_core::{RecordStore, User};
use tracing::debug;

/// Authenticated, active user
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

/// Authenticated, active superuser
#[derive(Clone, Debug)]
pub struct Superuser(pub User);

/// Caller if a usable bearer token was sent; anonymous otherwise
#[derive(Clone, Debug)]
pub struct MaybeUser(pub Option<User>);

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

async fn resolve_user(state: &AppState, token: &str) -> Result<User, ApiError> {
    let user_id = state.auth_service.validate_token(token).map_err(|e| {
        debug!("Rejected token: {}", e);
        ApiError::credentials()
    })?;

    let user = state.users.get_by_id(user_id).await.map_err(|e| {
        if e.is_not_found() {
            ApiError::credentials()
        } else {
            e.into()
        }
    })?;

    if !user.is_active {
        return Err(ApiError::BadRequest("Inactive user".to_string()));
    }
    Ok(user)
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let token = bearer_token(parts)
            .ok_or_else(|| ApiError::Forbidden("Not authenticated".to_string()))?;
        resolve_user(state, token).await.map(CurrentUser)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Superuser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !user.is_superuser {
            return Err(ApiError::Forbidden("Not enough permissions".to_string()));
        }
        Ok(Superuser(user))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let user = match bearer_token(parts) {
            Some(token) => resolve_user(state, token).await.ok(),
            None => None,
        };
        Ok(MaybeUser(user))
    }
}
