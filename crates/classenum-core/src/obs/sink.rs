//! Metrics sink boundary.
//!
//! Coercion and attribute logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
//!
//! This module is the only allowed bridge between engine logic
//! and the thread-local metrics state.
use crate::{coerce::CoercionErrorKind, obs::metrics};
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = RefCell::new(None);
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    Coerced {
        enum_path: &'static str,
    },
    Rejected {
        enum_path: &'static str,
        kind: CoercionErrorKind,
    },
    Write {
        enum_path: &'static str,
        field: &'static str,
        accepted: bool,
    },
    CacheHit {
        enum_path: &'static str,
    },
    CacheMiss {
        enum_path: &'static str,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default sink that writes into the thread-local metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::Coerced { enum_path } => {
                metrics::with_state_mut(|m| {
                    m.ops.coercions = m.ops.coercions.saturating_add(1);
                    let entry = m.enums.entry(enum_path.to_string()).or_default();
                    entry.coercions = entry.coercions.saturating_add(1);
                });
            }

            MetricsEvent::Rejected { enum_path, kind } => {
                metrics::with_state_mut(|m| {
                    m.ops.rejections = m.ops.rejections.saturating_add(1);
                    let entry = m.enums.entry(enum_path.to_string()).or_default();
                    let counter = match kind {
                        CoercionErrorKind::UnknownVariant => &mut entry.unknown_variant,
                        CoercionErrorKind::BlankNotAllowed => &mut entry.blank_not_allowed,
                        CoercionErrorKind::NilNotAllowed => &mut entry.nil_not_allowed,
                        CoercionErrorKind::TypeMismatch => &mut entry.type_mismatch,
                    };
                    *counter = counter.saturating_add(1);
                });
            }

            MetricsEvent::Write {
                enum_path,
                accepted,
                ..
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.writes = m.ops.writes.saturating_add(1);
                    let entry = m.enums.entry(enum_path.to_string()).or_default();
                    entry.writes = entry.writes.saturating_add(1);

                    if !accepted {
                        m.ops.rejected_writes = m.ops.rejected_writes.saturating_add(1);
                        entry.rejected_writes = entry.rejected_writes.saturating_add(1);
                    }
                });
            }

            MetricsEvent::CacheHit { enum_path } => {
                metrics::with_state_mut(|m| {
                    m.ops.cache_hits = m.ops.cache_hits.saturating_add(1);
                    let entry = m.enums.entry(enum_path.to_string()).or_default();
                    entry.cache_hits = entry.cache_hits.saturating_add(1);
                });
            }

            MetricsEvent::CacheMiss { enum_path } => {
                metrics::with_state_mut(|m| {
                    m.ops.cache_misses = m.ops.cache_misses.saturating_add(1);
                    let entry = m.enums.entry(enum_path.to_string()).or_default();
                    entry.cache_misses = entry.cache_misses.saturating_add(1);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    tracing::trace!(?event, "classenum metrics event");

    let sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());
    match sink {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current thread's metrics state.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all metrics state on the current thread.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override.
///
/// The previous sink is restored on every exit, including unwinding.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}

///
/// TESTS
///
