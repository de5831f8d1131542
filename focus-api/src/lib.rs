//! Wire types shared between focusd and focusctl.
//!
//! The daemon speaks plain JSON over local HTTP, so both sides only need
//! to agree on these shapes and the port.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default port the daemon binds on localhost.
pub const DEFAULT_PORT: u16 = 9029;

/// One temporal slot as reported by the daemon.
///
/// `until` is Unix seconds. Both fields serialize as explicit `null` when
/// absent - clients distinguish "no pause" from "pause" by testing the
/// field against null, so `skip_serializing_if` must not be used here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusSchedule {
    pub name: Option<String>,
    pub until: Option<i64>,
}

impl FocusSchedule {
    /// An empty slot (nothing active, nothing pending).
    pub fn unset() -> Self {
        Self::default()
    }

    /// An anonymous slot - a pause carries no name.
    pub fn anonymous(until: i64) -> Self {
        Self {
            name: None,
            until: Some(until),
        }
    }

    /// A named slot - overrides and recurring schedules.
    pub fn named(name: impl Into<String>, until: i64) -> Self {
        Self {
            name: Some(name.into()),
            until: Some(until),
        }
    }

    pub fn is_set(&self) -> bool {
        self.until.is_some()
    }
}

/// Aggregate returned by `GET /status`: all three slots, expired ones
/// already reported as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusStatus {
    pub pause: FocusSchedule,
    #[serde(rename = "override")]
    pub override_: FocusSchedule,
    pub schedule: FocusSchedule,
}

/// Body of `POST /pause`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PauseRequest {
    pub until: i64,
}

/// Body of `POST /override`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverrideRequest {
    pub name: String,
    pub until: i64,
}

/// Acknowledgement payload for the POST endpoints.
///
/// Failures ride on HTTP 200 with `status == "error"`; callers inspect the
/// status field rather than the HTTP code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ack {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Ack {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.status == "error"
    }
}

/// Errors a client can hit talking to the daemon.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("unexpected response from daemon: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("daemon reported an error: {0}")]
    Daemon(String),

    #[error("connection refused - is focusd running?")]
    ConnectionRefused,
}
