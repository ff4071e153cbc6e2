//! REST API over the feasibility engine.
//!
//! Endpoints:
//! - `GET /` liveness message
//! - `GET /health` dataset counts
//! - `POST /check-feasibility` one feasibility verdict
//! - `POST /briefing` verdict plus applicant briefing
//! - `GET /stations` map markers for every station
//! - `GET /insights` usage counters

mod error;
mod handlers;
mod types;

pub use error::ApiError;
pub use types::{CheckFeasibilityBody, ErrorResponse, FeasibilityResponse};

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServiceConfig;
use crate::engine::{FeasibilityEngine, Locale, UsageInsights};
use crate::grid::ServiceArea;

/// Application state shared across all request handlers.
///
/// Constructed once after the dataset is loaded and wrapped in `Arc`. The
/// engine is read-only; the insight counters are atomics, so no handler
/// ever takes a lock.
pub struct AppState {
    /// Decision engine over the loaded dataset.
    pub engine: FeasibilityEngine,
    /// Requests outside this box are rejected.
    pub service_area: ServiceArea,
    /// Language for requests without `lang`.
    pub default_locale: Locale,
    /// Allowed CORS origins, `*` for any.
    pub cors_origins: Vec<String>,
    /// Usage counters.
    pub insights: UsageInsights,
}

impl AppState {
    /// Builds the state from an engine and the service configuration.
    pub fn new(engine: FeasibilityEngine, config: &ServiceConfig) -> Self {
        Self {
            engine,
            service_area: config.service_area,
            default_locale: config.defaults.locale,
            cors_origins: config.server.cors_origins.clone(),
            insights: UsageInsights::new(),
        }
    }
}

/// Builds the axum router with all API routes, CORS, and request tracing.
///
/// # Arguments
///
/// * `state` - Shared application state
pub fn router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.cors_origins);
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/check-feasibility", post(handlers::check_feasibility))
        .route("/briefing", post(handlers::briefing))
        .route("/stations", get(handlers::stations))
        .route("/insights", get(handlers::insights))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy for the configured origins.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

/// Binds to the given address and serves the API until Ctrl-C.
///
/// # Arguments
///
/// * `state` - Shared application state
/// * `addr` - Socket address to bind to
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for Ctrl-C, serving until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
