//! Fixed-window rate limiting keyed by client address

use super::client_address;
use crate::error::ApiError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::warn;

pub struct RateLimiter {
    windows: Arc<DashMap<String, Window>>,
    max_requests: u32,
    period: Duration,
}

struct Window {
    started: Instant,
    count: u32,
}

impl RateLimiter {
    pub fn new(max_requests: u32, period: Duration) -> Self {
        Self {
            windows: Arc::new(DashMap::new()),
            max_requests,
            period,
        }
    }

    /// Count one request for `client`; false once its window is exhausted.
    pub fn check(&self, client: &str) -> bool {
        let now = Instant::now();
        let mut window = self
            .windows
            .entry(client.to_string())
            .or_insert(Window {
                started: now,
                count: 0,
            });

        if now.duration_since(window.started) >= self.period {
            window.started = now;
            window.count = 0;
        }
        if window.count >= self.max_requests {
            return false;
        }
        window.count += 1;
        true
    }

    fn purge_expired(windows: &DashMap<String, Window>, period: Duration) {
        let now = Instant::now();
        windows.retain(|_, window| now.duration_since(window.started) < period);
    }

    /// Periodically drop windows that have run out.
    pub fn start_cleanup_task(&self) -> JoinHandle<()> {
        let windows = self.windows.clone();
        let period = self.period;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period.max(Duration::from_secs(1)));
            loop {
                interval.tick().await;
                Self::purge_expired(&windows, period);
            }
        })
    }
}

pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request,
    next: Next,
) -> Response {
    let client = client_address(&req);
    if !limiter.check(&client) {
        warn!(client = %client, "Rate limit exceeded");
        return ApiError::RateLimited.into_response();
    }
    next.run(req).await
}
