//! HTTP handlers

pub mod auth;
pub mod health;
pub mod items;
pub mod users;

pub use health::{health, root};
