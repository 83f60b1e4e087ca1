//! Business logic services

pub mod auth;
pub mod seed;

pub use auth::{AuthError, AuthService};
pub use seed::seed_demo_data;
