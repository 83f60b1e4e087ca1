//! Catalog Server
//!
//! HTTP API over the in-memory user and item stores: registration, JWT
//! login, owner-scoped item management and superuser user administration.

mod config;
mod error;
mod extractors;
mod handlers;
mod middleware;
mod services;
mod validation;


use anyhow::{Context, Result};
use argon2::Argon2;
use axum::{
    http::HeaderValue,
    routing::{get, patch, post},
    Router,
};
use catalog_core::{ItemStore, UserStore};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use config::ServerConfig;
use middleware::RateLimiter;
use services::AuthService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserStore>,
    pub items: Arc<ItemStore>,
    pub auth_service: Arc<AuthService>,
    /// Budget for `/`
    pub root_limiter: Arc<RateLimiter>,
    /// Budget for `/health`, twice the root budget
    pub health_limiter: Arc<RateLimiter>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self::with_argon2(config, Argon2::default())
    }

    pub fn with_argon2(config: ServerConfig, argon2: Argon2<'static>) -> Self {
        let users = Arc::new(UserStore::new());
        let auth_service = Arc::new(AuthService::with_argon2(
            users.clone(),
            config.jwt_secret.clone(),
            config.access_token_expire_minutes,
            argon2,
        ));
        let period = Duration::from_secs(config.rate_limit_period_secs);
        let root_limiter = RateLimiter::new(config.rate_limit_requests, period);
        let health_limiter =
            RateLimiter::new(config.rate_limit_requests.saturating_mul(2), period);

        Self {
            users,
            items: Arc::new(ItemStore::new()),
            auth_service,
            root_limiter: Arc::new(root_limiter),
            health_limiter: Arc::new(health_limiter),
            config: Arc::new(config),
        }
    }
}

#[tokio::main]
async fn main() {
    // Set up panic hook to log crashes
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()));
        let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        eprintln!("[PANIC] at {:?}: {}", location, payload);
        tracing::error!("PANIC at {:?}: {}", location, payload);
    }));

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("[FATAL] Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(e) = tracing_subscriber::fmt().with_env_filter(filter).try_init() {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("Starting Catalog Server v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run_server(config).await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server(config: ServerConfig) -> Result<()> {
    if config.uses_default_secret() {
        warn!("CATALOG_JWT_SECRET not set, using default (insecure for production)");
    }
    info!(
        "Config loaded: bind={}, token_ttl={}m, rate_limit={}/{}s",
        config.bind_address,
        config.access_token_expire_minutes,
        config.rate_limit_requests,
        config.rate_limit_period_secs
    );

    let addr: SocketAddr = config
        .bind_address
        .parse()
        .context("Failed to parse bind address")?;

    let state = AppState::new(config);
    if state.config.seed_demo_data {
        let admin_password = &state.config.admin_password;
        services::seed_demo_data(&state.auth_service, &state.items, admin_password)
            .await
            .context("Failed to seed demo data")?;
    }
    state.root_limiter.start_cleanup_task();
    state.health_limiter.start_cleanup_task();

    let app = build_router(state);

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    // only the service info routes are rate limited
    let root = get(handlers::root).route_layer(axum::middleware::from_fn_with_state(
        state.root_limiter.clone(),
        middleware::rate_limit,
    ));
    let health = get(handlers::health).route_layer(axum::middleware::from_fn_with_state(
        state.health_limiter.clone(),
        middleware::rate_limit,
    ));

    Router::new()
        .route("/", root)
        .route("/health", health)
        .nest("/api/v1", api_routes())
        .layer(axum::middleware::from_fn(middleware::log_requests))
        .layer(cors_layer(&state.config.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/users/register", post(handlers::auth::register))
        .route("/users/login", post(handlers::auth::login))
        .route(
            "/users/me",
            get(handlers::users::me).put(handlers::users::update_me),
        )
        .route("/users", get(handlers::users::list))
        .route(
            "/users/:id",
            get(handlers::users::get)
                .put(handlers::users::update)
                .delete(handlers::users::delete),
        )
        .route(
            "/items",
            get(handlers::items::list).post(handlers::items::create),
        )
        .route("/items/my-items", get(handlers::items::my_items))
        .route(
            "/items/:id",
            get(handlers::items::get)
                .put(handlers::items::update)
                .delete(handlers::items::delete),
        )
        .route("/items/:id/status", patch(handlers::items::update_status))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allowed_origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}
