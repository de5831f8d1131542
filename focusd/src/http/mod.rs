//! Local HTTP interface.
//!
//! Four operations: `GET /status`, `POST /pause`, `POST /override`,
//! `GET /configurations`, plus a `GET /health` liveness probe. The server
//! binds localhost only; this is a local daemon, not a network service.

mod handlers;

pub use handlers::AppState;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::clock::Clock;
use crate::schedules::ScheduleStore;
use crate::state::StateRegister;

/// Wire up shared state for the request handlers.
pub fn app_state(
    register: Arc<StateRegister>,
    store: Arc<ScheduleStore>,
    clock: Arc<dyn Clock>,
) -> AppState {
    AppState {
        register,
        store,
        clock,
    }
}

/// Build the router with all endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/status", get(handlers::status))
        .route("/pause", post(handlers::pause))
        .route("/override", post(handlers::set_override))
        .route("/configurations", get(handlers::configurations))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind localhost and serve until the process exits.
pub async fn serve(port: u16, state: AppState) -> Result<()> {
    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
    let listener = TcpListener::bind(addr).await?;
    info!("focusd listening on http://{}", addr);

    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
