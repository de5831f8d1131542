//! The state register: the single owned record of the mutable slots.
//!
//! Pause and override are the only slots clients can write; the schedule
//! slot is derived from the [`crate::schedules::ScheduleStore`] at read
//! time. One coarse lock guards the register - contention is negligible at
//! this scale, and a single guard makes snapshots trivially consistent.

use std::sync::{PoisonError, RwLock};

/// Which of the three temporal slots a record belongs to.
///
/// Declaration order is precedence order, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SlotKind {
    Pause,
    Override,
    Schedule,
}

/// One tagged temporal record: active strictly while `now < until`.
///
/// Pause carries no name; override and schedule do. The slot kinds differ
/// only in that, so one record type covers all three.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub kind: SlotKind,
    pub name: Option<String>,
    pub until: i64,
}

impl Slot {
    pub fn pause(until: i64) -> Self {
        Self {
            kind: SlotKind::Pause,
            name: None,
            until,
        }
    }

    pub fn override_(name: impl Into<String>, until: i64) -> Self {
        Self {
            kind: SlotKind::Override,
            name: Some(name.into()),
            until,
        }
    }

    pub fn schedule(name: impl Into<String>, until: i64) -> Self {
        Self {
            kind: SlotKind::Schedule,
            name: Some(name.into()),
            until,
        }
    }

    /// Closed-interval expiry: `until == now` already counts as expired.
    pub fn is_active(&self, now: i64) -> bool {
        now < self.until
    }
}

/// Consistent view of both writable slots, taken under one read guard.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub pause: Option<Slot>,
    pub override_: Option<Slot>,
}

#[derive(Debug, Default)]
struct Slots {
    pause: Option<Slot>,
    override_: Option<Slot>,
}

/// In-memory register of the writable slots.
///
/// Writes replace a slot wholesale (last write wins); there is no explicit
/// clear - slots go absent by expiring, which readers detect lazily. A
/// poisoned lock is recovered rather than propagated: the register holds
/// plain data and a panicked writer cannot leave a half-written slot
/// behind the `RwLock`.
#[derive(Debug, Default)]
pub struct StateRegister {
    slots: RwLock<Slots>,
}

impl StateRegister {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pause slot. Pause is anonymous.
    pub fn set_pause(&self, until: i64) {
        let mut slots = self
            .slots
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        slots.pause = Some(Slot::pause(until));
    }

    /// Replace the override slot. The name is stored verbatim; it is not
    /// checked against the known configurations.
    pub fn set_override(&self, name: impl Into<String>, until: i64) {
        let mut slots = self
            .slots
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        slots.override_ = Some(Slot::override_(name, until));
    }

    /// Both slots under a single read guard - a reader never observes a
    /// torn `{name, until}` pair or a write landing between the two slots.
    pub fn snapshot(&self) -> Snapshot {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        Snapshot {
            pause: slots.pause.clone(),
            override_: slots.override_.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_start_empty() {
        let register = StateRegister::new();
        let snap = register.snapshot();
        assert!(snap.pause.is_none());
        assert!(snap.override_.is_none());
    }

    #[test]
    fn set_pause_does_not_touch_override() {
        let register = StateRegister::new();
        register.set_override("Work", 2000);
        register.set_pause(1500);

        let snap = register.snapshot();
        assert_eq!(snap.pause, Some(Slot::pause(1500)));
        assert_eq!(snap.override_, Some(Slot::override_("Work", 2000)));
    }

    #[test]
    fn writes_replace_the_slot_wholesale() {
        let register = StateRegister::new();
        register.set_override("Work", 2000);
        register.set_override("Deep Focus", 3000);

        let snap = register.snapshot();
        assert_eq!(snap.override_, Some(Slot::override_("Deep Focus", 3000)));
    }

    #[test]
    fn expiry_is_a_read_side_concept() {
        let register = StateRegister::new();
        register.set_pause(1060);

        // The register keeps the record; activity depends on the clock.
        let slot = register.snapshot().pause.unwrap();
        assert!(slot.is_active(1000));
        assert!(!slot.is_active(1060));
        assert!(!slot.is_active(1061));
    }
}
