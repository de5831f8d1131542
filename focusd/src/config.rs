//! Daemon settings.
//!
//! Optional `focusd.toml` inside the configuration directory; anything not
//! set there falls back to defaults, and CLI flags override both. The same
//! directory holds the schedule definition files, so the settings file name
//! is reserved and skipped by the schedule loader.

use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// File name reserved for daemon settings inside the config directory.
pub const SETTINGS_FILE: &str = "focusd.toml";

#[derive(Debug, Clone)]
pub struct Settings {
    /// Port to bind on localhost.
    pub port: u16,
    /// Directory holding the schedule definitions.
    pub schedules_dir: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSettings {
    port: Option<u16>,
    schedules_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: focus_api::DEFAULT_PORT,
            schedules_dir: default_config_dir(),
        }
    }
}

/// `~/.config/focus/` - the directory clients are told to put schedules in.
pub fn default_config_dir() -> PathBuf {
    match BaseDirs::new() {
        Some(dirs) => dirs.home_dir().join(".config").join("focus"),
        None => PathBuf::from(".config/focus"),
    }
}

impl Settings {
    /// Read `focusd.toml` from the default config directory if present.
    pub fn load() -> Result<Self> {
        let path = default_config_dir().join(SETTINGS_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw_str = fs::read_to_string(&path)
            .with_context(|| format!("failed to read settings at {:?}", path))?;
        let raw: RawSettings = toml::from_str(&raw_str)
            .with_context(|| format!("failed to parse settings at {:?}", path))?;
        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: RawSettings) -> Self {
        let defaults = Self::default();
        Self {
            port: raw.port.unwrap_or(defaults.port),
            schedules_dir: raw.schedules_dir.unwrap_or(defaults.schedules_dir),
        }
    }
}
