//! Request middleware

pub mod rate_limit;
pub mod request_log;

pub use rate_limit::{rate_limit, RateLimiter};
pub use request_log::log_requests;

use axum::{extract::ConnectInfo, extract::Request};
use std::net::SocketAddr;

/// Best-effort client identity: peer address, then `X-Forwarded-For`.
pub(crate) fn client_address(req: &Request) -> String {
    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }
    req.headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
