//! Stakewallet REST API
//!
//! Thin HTTP surface over the wallet service. Marshals requests, maps the
//! domain error taxonomy to status codes, and stays out of the engine's way.
//!
//! ```text
//! /api/wallets/{playerId}/deposit    POST   credit real funds
//! /api/wallets/{playerId}/withdraw   POST   debit + pending payout record
//! /api/wallets/{playerId}/bet        POST   wager, bonus drawn first
//! /api/wallets/{playerId}/win        POST   payout to real balance
//! /api/wallets/{playerId}/bonus      POST   credit promotional funds
//! /api/wallets/{playerId}/convert    POST   cross-currency conversion
//! /api/wallets/{playerId}/balance    GET    single-currency view
//! /api/wallets/{playerId}/balances   GET    all wallets + base aggregate
//! /api/transactions/{playerId}       GET    ledger history, newest first
//! /api/withdrawals/{id}/status       POST   back-office resolution
//! /api/reports/daily                 GET    trailing-24h activity totals
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

use axum::Router;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use error::{ApiError, ApiResult};
pub use state::AppState;

/// API configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Enable CORS for browser clients
    pub enable_cors: bool,
    /// Enable request tracing
    pub enable_tracing: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enable_cors: true,
            enable_tracing: true,
        }
    }
}

/// Create the main API router with middleware.
pub fn create_router(state: Arc<AppState>, config: ApiConfig) -> Router {
    let mut router = Router::new()
        .nest("/api", routes::api_routes())
        .route("/health", axum::routing::get(handlers::health::health_check))
        .with_state(state);

    if config.enable_tracing {
        router = router.layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        );
    }

    if config.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }

    router
}

/// Create a minimal router for testing.
pub fn create_test_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", routes::api_routes())
        .route("/health", axum::routing::get(handlers::health::health_check))
        .with_state(state)
}
