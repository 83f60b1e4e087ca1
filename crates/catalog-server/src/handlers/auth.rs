//! Registration and login handlers

use crate::error::ApiError;
use crate::validation::ValidJson;
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use catalog_core::{Token, User, UserCreate, UserLogin};
use tracing::info;

pub async fn register(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<UserCreate>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    info!("Registration attempt for: {}", req.username);
    let user = state.auth_service.register(req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn login(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<UserLogin>,
) -> Result<Json<Token>, ApiError> {
    info!("Login attempt for: {}", req.username);
    let user_id = state
        .auth_service
        .authenticate(&req.username, &req.password)
        .await?;
    let token = state.auth_service.issue_token(user_id)?;

    info!(user_id, "Login successful");
    Ok(Json(token))
}
