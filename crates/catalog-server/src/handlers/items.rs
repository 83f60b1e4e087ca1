//! Item handlers

use crate::error::ApiError;
use crate::extractors::{CurrentUser, MaybeUser};
use crate::validation::{ItemQuery, StatusQuery, ValidJson, ValidPath, ValidQuery};
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use catalog_core::{
    Item, ItemCreate, ItemFilter, ItemList, ItemUpdate, OwnedRecordStore, Page, RecordId,
    RecordStore,
};
use tracing::info;

async fn page_of(state: &AppState, filter: ItemFilter, query: ItemQuery) -> ItemList {
    let items = state.items.list(&filter, query.window()).await;
    let total = state.items.count(&filter).await;
    let size = query.size as usize;
    ItemList {
        items,
        total,
        page: query.page as usize,
        size,
        pages: Page::page_count(total, size),
    }
}

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidJson(req): ValidJson<ItemCreate>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let item = state.items.create(req.owned_by(user.id)).await?;
    info!(item_id = item.id, owner_id = user.id, "Item created");
    Ok((StatusCode::CREATED, Json(item)))
}

/// Public listing; a token is accepted but does not narrow the results.
pub async fn list(
    State(state): State<AppState>,
    MaybeUser(_viewer): MaybeUser,
    ValidQuery(query): ValidQuery<ItemQuery>,
) -> Json<ItemList> {
    let filter = ItemFilter::default().with_status(query.status);
    Json(page_of(&state, filter, query).await)
}

pub async fn my_items(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidQuery(query): ValidQuery<ItemQuery>,
) -> Json<ItemList> {
    let filter = ItemFilter::owned_by(user.id).with_status(query.status);
    Json(page_of(&state, filter, query).await)
}

pub async fn get(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<RecordId>,
) -> Result<Json<Item>, ApiError> {
    Ok(Json(state.items.get_by_id(id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidPath(id): ValidPath<RecordId>,
    ValidJson(update): ValidJson<ItemUpdate>,
) -> Result<Json<Item>, ApiError> {
    let item = state
        .items
        .update_owned(id, update, user.id)
        .await
        .map_err(|e| ApiError::for_action(e, "update"))?;
    Ok(Json(item))
}

pub async fn update_status(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidPath(id): ValidPath<RecordId>,
    ValidQuery(query): ValidQuery<StatusQuery>,
) -> Result<Json<Item>, ApiError> {
    let item = state
        .items
        .update_owned(id, ItemUpdate::status(query.status), user.id)
        .await
        .map_err(|e| ApiError::for_action(e, "update"))?;
    Ok(Json(item))
}

pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidPath(id): ValidPath<RecordId>,
) -> Result<StatusCode, ApiError> {
    state
        .items
        .delete_owned(id, user.id)
        .await
        .map_err(|e| ApiError::for_action(e, "delete"))?;
    info!(item_id = id, owner_id = user.id, "Item deleted");
    Ok(StatusCode::NO_CONTENT)
}
