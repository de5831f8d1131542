//! Named recurring schedules, loaded from the configuration directory.
//!
//! Each schedule is one TOML file: a unique name, an optional IANA
//! timezone (default UTC), and a set of weekly time-of-day windows.
//! The store is read once at startup and read-only afterwards; editing a
//! schedule requires a daemon restart.
//!
//! ```toml
//! name = "Work"
//! timezone = "Europe/Berlin"
//!
//! [[windows]]
//! days = ["mon", "tue", "wed", "thu", "fri"]
//! start = "09:00"
//! end = "12:30"
//! ```

use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveTime, TimeZone, Weekday};
use chrono_tz::Tz;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::SETTINGS_FILE;
use crate::state::Slot;

/// Errors in a single schedule definition file.
///
/// These are never fatal to the daemon: a bad file is skipped with a
/// warning and the rest of the store loads normally.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("unreadable file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid schedule file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("schedule name must not be empty")]
    EmptyName,

    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("invalid day: {0}")]
    InvalidDay(String),

    #[error("invalid time of day: {0}")]
    InvalidTime(String),

    #[error("window end {end} must be after start {start}")]
    InvalidWindow { start: String, end: String },
}

#[derive(Debug, Deserialize)]
struct RawDefinition {
    name: String,
    timezone: Option<String>,
    #[serde(default)]
    windows: Vec<RawWindow>,
}

#[derive(Debug, Deserialize)]
struct RawWindow {
    days: Vec<String>,
    start: String,
    end: String,
}

/// A weekly time-of-day window, same-day only (`start < end`).
#[derive(Debug, Clone)]
pub struct Window {
    days: Vec<Weekday>,
    start: NaiveTime,
    end: NaiveTime,
}

impl Window {
    fn contains(&self, weekday: Weekday, time: NaiveTime) -> bool {
        self.days.contains(&weekday) && self.start <= time && time < self.end
    }
}

/// One named recurring schedule.
#[derive(Debug, Clone)]
pub struct ScheduleDef {
    name: String,
    tz: Tz,
    windows: Vec<Window>,
}

impl ScheduleDef {
    /// Build a definition directly. Mostly useful for tests; production
    /// definitions come from [`ScheduleStore::load`].
    pub fn new(
        name: impl Into<String>,
        tz: Tz,
        windows: Vec<(Vec<Weekday>, NaiveTime, NaiveTime)>,
    ) -> Self {
        Self {
            name: name.into(),
            tz,
            windows: windows
                .into_iter()
                .map(|(days, start, end)| Window { days, start, end })
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn parse(raw: RawDefinition) -> Result<Self, ScheduleError> {
        if raw.name.trim().is_empty() {
            return Err(ScheduleError::EmptyName);
        }
        let tz: Tz = match raw.timezone {
            Some(tz) => tz
                .parse()
                .map_err(|_| ScheduleError::InvalidTimezone(tz))?,
            None => Tz::UTC,
        };

        let mut windows = Vec::with_capacity(raw.windows.len());
        for window in raw.windows {
            let start = parse_time(&window.start)?;
            let end = parse_time(&window.end)?;
            if end <= start {
                return Err(ScheduleError::InvalidWindow {
                    start: window.start,
                    end: window.end,
                });
            }
            let days = window
                .days
                .iter()
                .map(|day| parse_day(day))
                .collect::<Result<Vec<_>, _>>()?;
            windows.push(Window { days, start, end });
        }

        Ok(Self {
            name: raw.name,
            tz,
            windows,
        })
    }

    /// The window containing `now` in this schedule's timezone, if any,
    /// together with the Unix timestamp at which it closes.
    fn active_window_end(&self, now: i64) -> Option<i64> {
        let local = self.tz.timestamp_opt(now, 0).single()?;
        for window in &self.windows {
            if window.contains(local.weekday(), local.time()) {
                let end = local.date_naive().and_time(window.end);
                // earliest() resolves DST fold; a window end inside a DST
                // gap has no local representation and is skipped.
                if let Some(end) = self.tz.from_local_datetime(&end).earliest() {
                    return Some(end.timestamp());
                }
            }
        }
        None
    }
}

/// The ordered collection of named recurring schedules.
#[derive(Debug, Default)]
pub struct ScheduleStore {
    entries: Vec<ScheduleDef>,
}

impl ScheduleStore {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a store from in-memory definitions, keeping first-occurrence
    /// order and dropping duplicate names.
    pub fn from_defs(defs: Vec<ScheduleDef>) -> Self {
        let mut store = Self::empty();
        for def in defs {
            store.push(def);
        }
        store
    }

    /// Load every `*.toml` schedule file under `dir`, in path order.
    ///
    /// Never fails: a missing directory means zero configurations, an
    /// unreadable or invalid file is skipped with a warning. The daemon
    /// keeps serving pause/override/status either way.
    pub fn load(dir: &Path) -> Self {
        let mut paths: Vec<PathBuf> = match std::fs::read_dir(dir) {
            Ok(entries) => entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| {
                    path.extension().is_some_and(|ext| ext == "toml")
                        && path.file_name().is_some_and(|name| name != SETTINGS_FILE)
                })
                .collect(),
            Err(err) => {
                warn!(dir = %dir.display(), %err, "schedule directory unreadable, running with no configurations");
                return Self::empty();
            }
        };
        paths.sort();

        let mut store = Self::empty();
        for path in paths {
            match load_definition(&path) {
                Ok(def) => {
                    debug!(name = def.name(), path = %path.display(), "loaded schedule");
                    store.push(def);
                }
                Err(err) => {
                    warn!(path = %path.display(), %err, "skipping schedule file");
                }
            }
        }
        store
    }

    fn push(&mut self, def: ScheduleDef) {
        if self.entries.iter().any(|entry| entry.name == def.name) {
            warn!(name = def.name(), "duplicate schedule name, keeping the first");
            return;
        }
        self.entries.push(def);
    }

    /// Configuration names in load order.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.name.clone()).collect()
    }

    /// The schedule slot whose window contains `now`, if any. First match
    /// in load order wins.
    pub fn active_at(&self, now: i64) -> Option<Slot> {
        self.entries.iter().find_map(|entry| {
            entry
                .active_window_end(now)
                .map(|until| Slot::schedule(entry.name.clone(), until))
        })
    }
}

fn load_definition(path: &Path) -> Result<ScheduleDef, ScheduleError> {
    let raw = std::fs::read_to_string(path)?;
    ScheduleDef::parse(toml::from_str(&raw)?)
}

fn parse_time(s: &str) -> Result<NaiveTime, ScheduleError> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| ScheduleError::InvalidTime(s.to_string()))
}

fn parse_day(s: &str) -> Result<Weekday, ScheduleError> {
    match s.to_ascii_lowercase().as_str() {
        "mon" | "monday" => Ok(Weekday::Mon),
        "tue" | "tuesday" => Ok(Weekday::Tue),
        "wed" | "wednesday" => Ok(Weekday::Wed),
        "thu" | "thursday" => Ok(Weekday::Thu),
        "fri" | "friday" => Ok(Weekday::Fri),
        "sat" | "saturday" => Ok(Weekday::Sat),
        "sun" | "sunday" => Ok(Weekday::Sun),
        _ => Err(ScheduleError::InvalidDay(s.to_string())),
    }
}
