//! REST API for wattage previews and command checks.
//!
//! Provides three endpoints:
//! - `GET /fixture`: loaded table, ceiling, and theoretical maximum
//! - `GET /wattage`: estimate for channel levels given as query parameters
//! - `POST /commands/check`: guard verdict for a brightness command

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tracing::info;

use crate::guard::GuardPolicy;
use crate::wattage::table::WattageTable;

pub use types::{ErrorResponse, FixtureResponse, WattageQuery, WattageResponse};

/// Immutable application state shared across all request handlers.
///
/// The table is read-only after load, so no locks are needed.
pub struct AppState {
    /// Fixture table every request is evaluated against.
    pub table: WattageTable,
    /// Policy for `/commands/check`.
    pub policy: GuardPolicy,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/fixture", get(handlers::get_fixture))
        .route("/wattage", get(handlers::get_wattage))
        .route("/commands/check", post(handlers::check_command))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
