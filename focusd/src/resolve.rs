//! Resolution: pick the single "active now" state from the three slots.
//!
//! Pure over its inputs - no clock access, no register access - so the
//! precedence and expiry rules are testable as plain arithmetic.

use focus_api::FocusSchedule;

use crate::state::{Slot, SlotKind};

/// The resolved focus state at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Paused { until: i64 },
    Overridden { name: String, until: i64 },
    Scheduled { name: String, until: i64 },
    Idle,
}

/// Apply precedence (pause > override > schedule) over the live slots.
///
/// Expiry is checked per slot before precedence: an expired pause never
/// suppresses a live override. A slot with `until <= now` is simply not a
/// candidate.
pub fn resolve(
    now: i64,
    pause: Option<&Slot>,
    override_: Option<&Slot>,
    schedule: Option<&Slot>,
) -> Resolution {
    let winner = [pause, override_, schedule]
        .into_iter()
        .flatten()
        .filter(|slot| slot.is_active(now))
        .min_by_key(|slot| slot.kind);

    match winner {
        Some(slot) => match slot.kind {
            SlotKind::Pause => Resolution::Paused { until: slot.until },
            SlotKind::Override => Resolution::Overridden {
                name: slot.name.clone().unwrap_or_default(),
                until: slot.until,
            },
            SlotKind::Schedule => Resolution::Scheduled {
                name: slot.name.clone().unwrap_or_default(),
                until: slot.until,
            },
        },
        None => Resolution::Idle,
    }
}

/// Wire view of a single slot: expired or absent slots report as unset.
pub fn report(slot: Option<&Slot>, now: i64) -> FocusSchedule {
    match slot {
        Some(slot) if slot.is_active(now) => FocusSchedule {
            name: slot.name.clone(),
            until: Some(slot.until),
        },
        _ => FocusSchedule::unset(),
    }
}
