//! Observability: runtime telemetry (metrics) and sink abstractions.
//!
//! Coercion and attribute code never touch metrics state directly; every
//! signal flows through `MetricsEvent` and the active `MetricsSink`.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EnumCounters, EventOps, EventReport};
pub use sink::{MetricsEvent, MetricsSink, metrics_report, metrics_reset_all, with_metrics_sink};
