//! Request handlers.
//!
//! The POST endpoints keep the observed contract of the original daemon:
//! malformed bodies come back as HTTP 200 with `{"status":"error",...}`,
//! never as an HTTP error or a crash. That is why the body is taken as raw
//! bytes and decoded by hand instead of through the `Json` extractor,
//! which would reject bad input with a 4xx before the handler runs.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;
use tracing::{debug, info, warn};

use focus_api::{Ack, FocusStatus, OverrideRequest, PauseRequest};

use crate::clock::Clock;
use crate::resolve::{report, resolve};
use crate::schedules::ScheduleStore;
use crate::state::StateRegister;

/// Shared state handed to every handler. The register is the single owned
/// instance created at startup; nothing here is ambient or global.
#[derive(Clone)]
pub struct AppState {
    pub register: Arc<StateRegister>,
    pub store: Arc<ScheduleStore>,
    pub clock: Arc<dyn Clock>,
}

/// Liveness probe.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `GET /status` - all three slots, expired ones reported as unset.
pub async fn status(State(state): State<AppState>) -> Json<FocusStatus> {
    let now = state.clock.now();
    let snapshot = state.register.snapshot();
    let schedule = state.store.active_at(now);

    let resolution = resolve(
        now,
        snapshot.pause.as_ref(),
        snapshot.override_.as_ref(),
        schedule.as_ref(),
    );
    debug!(?resolution, "status resolved");

    Json(FocusStatus {
        pause: report(snapshot.pause.as_ref(), now),
        override_: report(snapshot.override_.as_ref(), now),
        schedule: report(schedule.as_ref(), now),
    })
}

/// `POST /pause` - replace the pause slot.
pub async fn pause(State(state): State<AppState>, body: Bytes) -> Json<Ack> {
    let request: PauseRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            warn!(%err, "rejected malformed pause request");
            return Json(Ack::error(format!("invalid pause request: {err}")));
        }
    };

    state.register.set_pause(request.until);
    info!(until = request.until, "pause set");
    Json(Ack::ok())
}

/// `POST /override` - replace the override slot.
///
/// The name is not validated against the known configurations; the caller
/// is trusted and an unknown name is stored and reported verbatim.
pub async fn set_override(State(state): State<AppState>, body: Bytes) -> Json<Ack> {
    let request: OverrideRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            warn!(%err, "rejected malformed override request");
            return Json(Ack::error(format!("invalid override request: {err}")));
        }
    };

    if !state.store.names().iter().any(|name| name == &request.name) {
        debug!(name = %request.name, "override names an unknown configuration");
    }
    state.register.set_override(&request.name, request.until);
    info!(name = %request.name, until = request.until, "override set");
    Json(Ack::ok())
}

/// `GET /configurations` - the configured schedule names, in load order.
pub async fn configurations(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.store.names())
}
