//! focusd - a local daemon tracking focus-mode state.
//!
//! Three temporal slots (pause, override, recurring schedule) live in an
//! in-memory register; resolution picks the one active "now" by precedence.
//! A small HTTP API on localhost exposes the state to clients.

pub mod clock;
pub mod config;
pub mod http;
pub mod resolve;
pub mod schedules;
pub mod state;

pub use clock::{Clock, ManualClock, SystemClock};
pub use resolve::{resolve, Resolution};
pub use schedules::ScheduleStore;
pub use state::{Slot, SlotKind, StateRegister};
