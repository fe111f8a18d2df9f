//! axum HTTP surface for launchkit.
//!
//! | route | handler |
//! |---|---|
//! | `POST /api/generate` | [`routes::generate`] |
//! | `POST /api/market-analysis` | [`routes::market_analysis`] |
//! | `POST /api/market-analysis-summary` | [`routes::market_analysis_summary`] |
//! | `GET /api/templates` | [`routes::list_templates`] |
//! | `GET /health` | [`routes::health`] |

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

pub use config::{GenerateProvider, ServerConfig, DEFAULT_BODY_LIMIT};
pub use state::{AppState, ProviderStatus};

/// Builds the complete API router. Bodies larger than `body_limit` bytes
/// are rejected with 413 before reaching a handler.
pub fn build_router(state: Arc<AppState>, body_limit: usize) -> Router {
    let api = Router::new()
        .route("/generate", post(routes::generate))
        .route("/market-analysis", post(routes::market_analysis))
        .route("/market-analysis-summary", post(routes::market_analysis_summary))
        .route("/templates", get(routes::list_templates));

    Router::new()
        .nest("/api", api)
        .route("/health", get(routes::health))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
