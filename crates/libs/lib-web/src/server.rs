//! # Server Setup
//!
//! Tracing initialisation, store selection, route registration, and HTTP server startup.

// region: --- Imports
use axum::{
    extract::FromRef,
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use lib_core::{
    create_pool, ensure_schema, Config, MemoryUserStore, SqliteUserStore, StoreKind, UserStore,
};
use lib_utils::get_env_or;
use std::{path::PathBuf, sync::Arc};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::handlers;
use crate::middleware::{log_requests, require_auth, stamp_req};
use crate::services::AuthService;
// endregion: --- Imports

// region: --- AppState
/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
}

impl AppState {
    pub fn new(auth: AuthService) -> Self {
        Self { auth }
    }
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
// endregion: --- AppState

// region: --- Server Configuration
/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8000")
    pub bind_address: String,
    /// Allowed CORS origins
    pub allowed_origins: Vec<String>,
    /// Directory holding `frontend.html` and other static assets
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8000".to_string(),
            allowed_origins: vec![
                "http://localhost:8000".to_string(),
                "http://127.0.0.1:8000".to_string(),
            ],
            static_dir: PathBuf::from("static"),
        }
    }
}

impl ServerConfig {
    /// Read `BIND_ADDRESS`, `ALLOWED_ORIGINS` (comma-separated), and `STATIC_DIR`.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let allowed_origins = match std::env::var("ALLOWED_ORIGINS") {
            Ok(origins) => origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect(),
            Err(_) => defaults.allowed_origins,
        };

        Self {
            bind_address: get_env_or("BIND_ADDRESS", &defaults.bind_address),
            allowed_origins,
            static_dir: PathBuf::from(get_env_or("STATIC_DIR", "static")),
        }
    }
}
// endregion: --- Server Configuration

// region: --- Server Setup
/// Install the global tracing subscriber, level from `LOG_LEVEL` (default `info`).
pub fn init_tracing() {
    let log_level = get_env_or("LOG_LEVEL", "info").to_lowercase();

    let filter = match log_level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => EnvFilter::new(log_level),
        _ => EnvFilter::new("info"),
    };

    // a second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .try_init();
}

/// Build the credential store selected by configuration.
pub async fn build_store(config: &Config) -> lib_core::Result<Arc<dyn UserStore>> {
    match config.user_store {
        StoreKind::Sqlite => {
            info!(database_url = %config.database_url, "[STORE] Using SQLite user store");
            let pool = create_pool(&config.database_url).await?;
            ensure_schema(&pool).await?;
            Ok(Arc::new(SqliteUserStore::new(pool)))
        }
        StoreKind::Memory => {
            warn!("[STORE] Using in-memory user store; accounts are lost on restart");
            Ok(Arc::new(MemoryUserStore::new()))
        }
    }
}

/// Initialize and start the HTTP server
///
/// # Errors
///
/// This function will return an error if:
/// - Configuration loading or validation fails (including a missing secret)
/// - The credential store cannot be opened
/// - Server binding fails
pub async fn start_server(server_config: ServerConfig) -> anyhow::Result<()> {
    init_tracing();

    info!("[STARTUP] Account service starting");

    let config = Config::load()?;
    info!(
        user_store = ?config.user_store,
        token_ttl_minutes = config.token_ttl_minutes,
        "[STARTUP] Configuration loaded"
    );

    let store = build_store(&config).await?;
    let state = AppState::new(AuthService::from_config(store, &config));

    let app = create_router(state, &server_config);

    let listener = tokio::net::TcpListener::bind(&server_config.bind_address).await?;

    info!("[STARTUP] SERVER READY: http://{}", server_config.bind_address);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Create the main application router with all routes
pub fn create_router(state: AppState, server_config: &ServerConfig) -> Router {
    let origins: Vec<HeaderValue> = server_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let protected = Router::new()
        .route("/auth/me", get(handlers::auth::me))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let static_dir = &server_config.static_dir;

    Router::new()
        .route("/auth/signup", post(handlers::auth::signup))
        .route("/auth/login", post(handlers::auth::login))
        .merge(protected)
        .route("/health", get(|| async { "OK" }))
        .route_service("/", ServeFile::new(static_dir.join("frontend.html")))
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(|| async { (StatusCode::NOT_FOUND, "Route not found") })
        .with_state(state)
        .layer(from_fn(log_requests))
        // stamping wraps logging so the request ID is already set
        .layer(from_fn(stamp_req))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
// endregion: --- Server Setup
