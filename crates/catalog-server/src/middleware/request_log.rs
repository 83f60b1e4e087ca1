//! Per-request logging and timing headers

use super::client_address;
use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

pub async fn log_requests(req: Request, next: Next) -> Response {
    let started = Instant::now();
    let request_id = Uuid::new_v4().to_string();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let client = client_address(&req);

    info!(%request_id, %method, %uri, %client, "Request started");
    let mut response = next.run(req).await;
    let elapsed = started.elapsed().as_secs_f64();

    info!(
        %request_id,
        %method,
        %uri,
        status = response.status().as_u16(),
        elapsed_secs = elapsed,
        "Request completed"
    );

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&format!("{elapsed:.4}")) {
        headers.insert("x-process-time", value);
    }
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        headers.insert("x-request-id", value);
    }
    response
}
