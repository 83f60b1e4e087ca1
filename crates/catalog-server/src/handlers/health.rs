//! Liveness and service info

use crate::AppState;
use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339(),
        "app_name": state.config.app_name,
    }))
}

pub async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": format!("Welcome to {}", state.config.app_name),
        "version": env!("CARGO_PKG_VERSION"),
        "health_check": "/health",
    }))
}
