//! # Server Setup
//!
//! Server initialization, route registration, and HTTP server startup.
//!
//! [`start_server`] loads configuration, opens and migrates the database,
//! wires the [`IdentityService`] and serves the router built by
//! [`create_router`].

// region: --- Imports
use crate::handlers;
use crate::middleware::{log_requests, require_auth, stamp_req, RequestStamp};
use crate::services::IdentityService;
use axum::{
    extract::FromRef,
    http::{HeaderValue, Method, Request, Response},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use lib_core::model::store::AccountRepository;
use lib_core::{create_pool, migrate, AppError, Config};
use std::sync::Arc;
use std::time::Duration;
use tower_http::classify::ServerErrorsFailureClass;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Span};
use tracing_subscriber::EnvFilter;
// endregion: --- Imports

// region: --- AppState
/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<IdentityService>,
}

impl AppState {
    pub fn new(identity: IdentityService) -> Self {
        Self {
            identity: Arc::new(identity),
        }
    }
}

impl FromRef<AppState> for Arc<IdentityService> {
    fn from_ref(state: &AppState) -> Self {
        state.identity.clone()
    }
}
// endregion: --- AppState

// region: --- Server Configuration
/// Server configuration
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080")
    pub bind_address: String,
    /// Allowed CORS origins; empty allows any origin
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}
// endregion: --- Server Configuration

// region: --- Server Setup
/// Initialize and start the HTTP server
///
/// # Errors
///
/// This function will return an error if:
/// - Configuration loading or validation fails (e.g. `JWT_SECRET` missing)
/// - Database connection or migrations fail
/// - Server binding fails
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    init_tracing()?;

    info!("Starting identity backend...");

    let core_config = Config::from_env()?;
    core_config.validate()?;
    info!("Configuration loaded: {:?}", core_config);

    ensure_database_dir(&core_config.database_url)?;
    let pool = create_pool(&core_config.database_url).await?;
    info!("Database connected: {}", core_config.database_url);

    migrate(&pool).await?;
    info!("Database migrations applied");

    let store = Arc::new(AccountRepository::new(pool));
    let identity = IdentityService::from_config(&core_config, store)?;
    let state = AppState::new(identity);

    let app = create_router(state, &config.allowed_origins);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!("Server listening on http://{}", config.bind_address);
    log_server_info();

    axum::serve(listener, app).await?;

    Ok(())
}

/// Install the global tracing subscriber. `LOG_LEVEL` picks the level.
fn init_tracing() -> anyhow::Result<()> {
    let log_level = std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase();

    let filter = match log_level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => EnvFilter::new(&log_level),
        _ => EnvFilter::new("info"),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

/// SQLite creates the database file but not its parent directory.
fn ensure_database_dir(database_url: &str) -> anyhow::Result<()> {
    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");

    if path.starts_with(':') {
        return Ok(());
    }

    let path = path.split('?').next().unwrap_or(path);
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    Ok(())
}

/// Create the application router with all routes and middleware
pub fn create_router(state: AppState, allowed_origins: &[String]) -> Router {
    let protected = Router::new()
        .route("/me", get(handlers::users::me))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    info!("[ROUTE SETUP] Registering HTTP routes...");
    Router::new()
        .route("/users", post(handlers::users::register))
        .route("/users/{id}", get(handlers::users::get_user))
        .route("/login", post(handlers::users::login))
        .route("/health", get(handlers::users::health))
        .merge(protected)
        .fallback(|| async {
            info!("[404 HANDLER] Unmatched route - returning 404");
            AppError::NotFound("Route not found".to_string())
        })
        .with_state(state)
        // Innermost first: logging sees the stamp, the stamp wraps the span.
        .layer(from_fn(log_requests))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let request_id = request
                        .extensions()
                        .get::<RequestStamp>()
                        .map(|s| s.id.clone())
                        .unwrap_or_else(|| "unknown".to_string());
                    tracing::info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = %request.method(),
                        uri = %request.uri(),
                        version = ?request.version(),
                    )
                })
                .on_response(|_response: &Response<_>, _latency: Duration, _span: &Span| {
                    // Detailed logging is handled by log_requests middleware
                })
                .on_failure(
                    |error: ServerErrorsFailureClass, latency: Duration, _span: &Span| {
                        tracing::error!(
                            error = ?error,
                            latency_ms = latency.as_millis(),
                            "[HTTP FAILURE] Error: {:?}, Latency: {}ms",
                            error,
                            latency.as_millis()
                        );
                    },
                ),
        )
        .layer(from_fn(stamp_req))
        .layer(cors_layer(allowed_origins))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
        ]);

    if allowed_origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    cors.allow_origin(origins)
}

/// Log server information
fn log_server_info() {
    info!(" ACCOUNTS:");
    info!("   • POST /users        {{username, email, password}}");
    info!("   • GET  /users/{{id}}");
    info!(" AUTH:");
    info!("   • POST /login        {{username, password}}");
    info!("   • GET  /me           Authorization: Bearer <token>");
    info!(" HEALTH:");
    info!("   • GET  /health");
}
// endregion: --- Server Setup
