//! HTTP error responses

use crate::services::AuthError;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use catalog_core::StoreError;
use serde::Serialize;
use serde_json::json;
use tracing::error;

/// One failed field check, reported in the `detail` list of a 422 response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldError {
    pub fn body(field: &str, msg: impl Into<String>) -> Self {
        Self::at("body", field, msg)
    }

    pub fn query(field: &str, msg: impl Into<String>) -> Self {
        Self::at("query", field, msg)
    }

    /// Failure that concerns a whole request part rather than one field
    pub fn whole(location: &str, msg: impl Into<String>) -> Self {
        Self {
            loc: vec![location.to_string()],
            msg: msg.into(),
            kind: "value_error".to_string(),
        }
    }

    fn at(location: &str, field: &str, msg: impl Into<String>) -> Self {
        Self {
            loc: vec![location.to_string(), field.to_string()],
            msg: msg.into(),
            kind: "value_error".to_string(),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    /// Bearer token missing or unusable
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    Validation(Vec<FieldError>),
    RateLimited,
    Internal(String),
}

impl ApiError {
    pub fn credentials() -> Self {
        ApiError::Unauthorized("Could not validate credentials".to_string())
    }

    /// Map a store failure for an owner-scoped action such as "update" or "delete".
    pub fn for_action(err: StoreError, action: &str) -> Self {
        match err {
            StoreError::Forbidden { kind, .. } => ApiError::Forbidden(format!(
                "Not enough permissions to {action} this {kind}"
            )),
            other => other.into(),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { kind, .. } => {
                ApiError::NotFound(format!("{} not found", capitalize(kind)))
            }
            StoreError::Duplicate { field, .. } => ApiError::Conflict(match field {
                "email" => "Email already registered".to_string(),
                "username" => "Username already taken".to_string(),
                other => format!("{} already exists", capitalize(other)),
            }),
            StoreError::Forbidden { .. } => {
                ApiError::Forbidden("Not enough permissions".to_string())
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized("Incorrect username or password".to_string())
            }
            AuthError::InvalidToken(_) => ApiError::credentials(),
            AuthError::Store(store) => store.into(),
            AuthError::Hashing(msg) | AuthError::Token(msg) => ApiError::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "detail": errors })),
            )
                .into_response(),
            ApiError::Unauthorized(detail) => (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Bearer")],
                Json(json!({ "detail": detail })),
            )
                .into_response(),
            ApiError::Internal(msg) => {
                error!("Unexpected error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "detail": "Internal server error",
                        "type": "internal_error"
                    })),
                )
                    .into_response()
            }
            ApiError::BadRequest(detail) => detail_response(StatusCode::BAD_REQUEST, detail),
            ApiError::Forbidden(detail) => detail_response(StatusCode::FORBIDDEN, detail),
            ApiError::NotFound(detail) => detail_response(StatusCode::NOT_FOUND, detail),
            ApiError::Conflict(detail) => detail_response(StatusCode::CONFLICT, detail),
            ApiError::RateLimited => detail_response(
                StatusCode::TOO_MANY_REQUESTS,
                "Rate limit exceeded".to_string(),
            ),
        }
    }
}

fn detail_response(status: StatusCode, detail: String) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}
