//! User handlers

use crate::error::ApiError;
use crate::extractors::{CurrentUser, Superuser};
use crate::validation::{SkipLimit, ValidJson, ValidPath, ValidQuery};
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use catalog_core::{AllRecords, RecordId, RecordStore, User, UserUpdate};
use tracing::info;

pub async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}

/// Self-service profile update; privilege changes are ignored.
pub async fn update_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidJson(mut update): ValidJson<UserUpdate>,
) -> Result<Json<User>, ApiError> {
    update.is_superuser = None;
    let updated = state.users.update(user.id, update).await?;
    Ok(Json(updated))
}

pub async fn list(
    State(state): State<AppState>,
    _admin: Superuser,
    ValidQuery(query): ValidQuery<SkipLimit>,
) -> Json<Vec<User>> {
    Json(state.users.list(&AllRecords, query.page()).await)
}

pub async fn get(
    State(state): State<AppState>,
    _admin: Superuser,
    ValidPath(id): ValidPath<RecordId>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.users.get_by_id(id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    _admin: Superuser,
    ValidPath(id): ValidPath<RecordId>,
    ValidJson(update): ValidJson<UserUpdate>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.users.update(id, update).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Superuser(admin): Superuser,
    ValidPath(id): ValidPath<RecordId>,
) -> Result<StatusCode, ApiError> {
    state.users.delete(id).await?;
    info!(admin_id = admin.id, user_id = id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
