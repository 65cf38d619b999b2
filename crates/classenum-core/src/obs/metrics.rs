use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters for coercion and attribute activity.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub(crate) struct EventState {
    pub ops: EventOps,
    pub enums: BTreeMap<String, EnumCounters>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Coercer
    pub coercions: u64,
    pub rejections: u64,

    // Attribute adapter
    pub writes: u64,
    pub rejected_writes: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
}

///
/// EnumCounters
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EnumCounters {
    pub coercions: u64,
    pub unknown_variant: u64,
    pub blank_not_allowed: u64,
    pub nil_not_allowed: u64,
    pub type_mismatch: u64,
    pub writes: u64,
    pub rejected_writes: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
}

///
/// EventReport
/// Point-in-time copy of the counters.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventReport {
    pub ops: EventOps,
    pub enums: BTreeMap<String, EnumCounters>,
}

impl EventReport {
    /// Counters for one enum path, or zeroes if it never recorded anything.
    #[must_use]
    pub fn enum_counters(&self, path: &str) -> EnumCounters {
        self.enums.get(path).cloned().unwrap_or_default()
    }
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters (useful in tests).
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

#[must_use]
pub(crate) fn report() -> EventReport {
    with_state(|m| EventReport {
        ops: m.ops.clone(),
        enums: m.enums.clone(),
    })
}
