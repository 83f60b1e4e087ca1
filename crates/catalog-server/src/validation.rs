//! Request payload and query validation

use crate::error::{ApiError, FieldError};
use async_trait::async_trait;
use axum::{
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use catalog_core::{ItemCreate, ItemStatus, ItemUpdate, Page, UserCreate, UserLogin, UserUpdate};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::OnceLock;

const MIN_USERNAME_LEN: usize = 3;
const MIN_PASSWORD_LEN: usize = 8;
const MAX_USER_LIMIT: i64 = 1000;
const MAX_PAGE_SIZE: i64 = 100;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
            .expect("email pattern compiles")
    })
}

/// Checks a deserialized payload and normalizes it in place.
pub trait Validate: Sized {
    fn validate(self) -> Result<Self, Vec<FieldError>>;
}

pub fn check_email(email: &str) -> Result<String, String> {
    let email = email.trim();
    if email_regex().is_match(email) {
        Ok(email.to_string())
    } else {
        Err("value is not a valid email address".to_string())
    }
}

pub fn check_username(username: &str) -> Result<String, String> {
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err("Username must be at least 3 characters long".to_string());
    }
    if !username.chars().all(char::is_alphanumeric) {
        return Err("Username must contain only alphanumeric characters".to_string());
    }
    Ok(username.to_lowercase())
}

pub fn check_password(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 8 characters long".to_string());
    }
    if !password.chars().any(char::is_uppercase) {
        return Err("Password must contain at least one uppercase letter".to_string());
    }
    if !password.chars().any(char::is_lowercase) {
        return Err("Password must contain at least one lowercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain at least one digit".to_string());
    }
    Ok(())
}

pub fn check_title(title: &str) -> Result<String, String> {
    match title.trim() {
        "" => Err("Title cannot be empty".to_string()),
        trimmed => Ok(trimmed.to_string()),
    }
}

pub fn check_price(price: f64) -> Result<f64, String> {
    if price.is_finite() && price > 0.0 {
        Ok((price * 100.0).round() / 100.0)
    } else {
        Err("Price must be greater than 0".to_string())
    }
}

/// Collects field failures so a payload reports every problem at once.
#[derive(Default)]
struct Report(Vec<FieldError>);

impl Report {
    fn field<T>(&mut self, name: &str, result: Result<T, String>) -> Option<T> {
        result.map_err(|msg| self.0.push(FieldError::body(name, msg))).ok()
    }

    fn finish<T>(self, value: T) -> Result<T, Vec<FieldError>> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(self.0)
        }
    }
}

impl Validate for UserCreate {
    fn validate(mut self) -> Result<Self, Vec<FieldError>> {
        let mut report = Report::default();
        if let Some(email) = report.field("email", check_email(&self.email)) {
            self.email = email;
        }
        if let Some(username) = report.field("username", check_username(&self.username)) {
            self.username = username;
        }
        report.field("password", check_password(&self.password));
        report.finish(self)
    }
}

impl Validate for UserLogin {
    fn validate(self) -> Result<Self, Vec<FieldError>> {
        Ok(self)
    }
}

impl Validate for UserUpdate {
    fn validate(mut self) -> Result<Self, Vec<FieldError>> {
        let mut report = Report::default();
        if let Some(email) = &self.email {
            self.email = report.field("email", check_email(email));
        }
        if let Some(username) = &self.username {
            self.username = report.field("username", check_username(username));
        }
        report.finish(self)
    }
}

impl Validate for ItemCreate {
    fn validate(mut self) -> Result<Self, Vec<FieldError>> {
        let mut report = Report::default();
        if let Some(title) = report.field("title", check_title(&self.title)) {
            self.title = title;
        }
        if let Some(price) = report.field("price", check_price(self.price)) {
            self.price = price;
        }
        report.finish(self)
    }
}

impl Validate for ItemUpdate {
    fn validate(mut self) -> Result<Self, Vec<FieldError>> {
        let mut report = Report::default();
        if let Some(title) = &self.title {
            self.title = report.field("title", check_title(title));
        }
        if let Some(price) = self.price {
            self.price = report.field("price", check_price(price));
        }
        report.finish(self)
    }
}

/// `?skip=&limit=` for user listings
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SkipLimit {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

impl SkipLimit {
    pub fn page(&self) -> Page {
        Page::new(self.skip as usize, self.limit as usize)
    }
}

impl Validate for SkipLimit {
    fn validate(self) -> Result<Self, Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.skip < 0 {
            errors.push(FieldError::query(
                "skip",
                "ensure this value is greater than or equal to 0",
            ));
        }
        if !(1..=MAX_USER_LIMIT).contains(&self.limit) {
            errors.push(FieldError::query(
                "limit",
                format!("ensure this value is between 1 and {MAX_USER_LIMIT}"),
            ));
        }
        Report(errors).finish(self)
    }
}

/// `?page=&size=&status=` for item listings
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ItemQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_size")]
    pub size: i64,
    #[serde(default)]
    pub status: Option<ItemStatus>,
}

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    10
}

impl ItemQuery {
    pub fn window(&self) -> Page {
        Page::numbered(self.page as usize, self.size as usize)
    }
}

impl Validate for ItemQuery {
    fn validate(self) -> Result<Self, Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.page < 1 {
            errors.push(FieldError::query(
                "page",
                "ensure this value is greater than or equal to 1",
            ));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.size) {
            errors.push(FieldError::query(
                "size",
                format!("ensure this value is between 1 and {MAX_PAGE_SIZE}"),
            ));
        }
        Report(errors).finish(self)
    }
}

/// `?status=` for the status-only item patch
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StatusQuery {
    pub status: ItemStatus,
}

impl Validate for StatusQuery {
    fn validate(self) -> Result<Self, Vec<FieldError>> {
        Ok(self)
    }
}

/// JSON body that has been deserialized and validated
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                ApiError::Validation(vec![FieldError::whole("body", rejection.body_text())])
            })?;
        value.validate().map(ValidJson).map_err(ApiError::Validation)
    }
}

/// Query string that has been deserialized and validated
pub struct ValidQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                ApiError::Validation(vec![FieldError::whole("query", rejection.body_text())])
            })?;
        value.validate().map(ValidQuery).map_err(ApiError::Validation)
    }
}

/// Path parameters that must deserialize, reported as 422 otherwise
pub struct ValidPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(value)| ValidPath(value))
            .map_err(|rejection| {
                ApiError::Validation(vec![FieldError::whole("path", rejection.body_text())])
            })
    }
}
