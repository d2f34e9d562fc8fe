//! Core monitoring traits for universal event observation.

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::types::MonitoringSnapshot;

/// Event severity levels for filtering and categorization.
///
/// Ordered from lowest to highest severity for filtering purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum EventSeverity {
    /// Trace-level events for detailed debugging
    Trace,
    /// Debug-level events for development
    Debug,
    /// Informational events for normal operations
    Info,
    /// Warning events for potential issues
    Warning,
    /// Error events for failures
    Error,
    /// Critical events for system-level failures
    Critical,
}

impl EventSeverity {
    /// Dense index into a fixed-size per-severity counter array, matching
    /// declaration order.
    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// One past the highest index [`EventSeverity::index`] returns.
    pub(crate) const COUNT: usize = 6;
}

/// Trait for events that can be monitored.
///
/// All event types must implement this trait to be compatible with the
/// `Monitor<E>` system — in this crate, that event type is
/// [`crate::monitoring::PipelineEvent`].
pub trait MonitoringEvent: Send + Sync + Clone + Debug + Serialize + 'static {
    /// Static event type identifier for categorization.
    const EVENT_TYPE: &'static str;

    /// Returns the timestamp when this event occurred.
    fn timestamp(&self) -> DateTime<Utc>;

    /// Returns the severity level of this event.
    fn severity(&self) -> EventSeverity;
}

/// Generic monitoring trait a [`crate::stage::Stage`] records its lifecycle
/// events through.
///
/// Recording never fails — a pipeline's control flow should never depend on
/// whether an event was observed, so implementations absorb their own
/// failures (e.g. [`super::InMemoryMonitor`] simply drops an event rather
/// than surfacing a lock error to the caller).
///
/// # Examples
/// ```
/// use conveyor::monitoring::{InMemoryMonitor, Monitor, MonitoringConfig, PipelineEvent, PipelineEventKind};
/// use conveyor::util::StageId;
/// use chrono::Utc;
///
/// # async fn example() {
/// let monitor = InMemoryMonitor::new(MonitoringConfig::default());
/// monitor.record(PipelineEvent {
///     timestamp: Utc::now(),
///     stage_id: StageId::new(),
///     stage_name: "square".to_string(),
///     kind: PipelineEventKind::StageDrained,
/// }).await;
/// let snapshot = monitor.snapshot().await;
/// assert_eq!(snapshot.total_events, 1);
/// # }
/// ```
#[async_trait]
pub trait Monitor<E: MonitoringEvent>: Send + Sync + Clone {
    /// Records a monitoring event.
    async fn record(&self, event: E);

    /// Generates a snapshot of the current monitoring state.
    async fn snapshot(&self) -> MonitoringSnapshot<E>;

    /// Resets the monitor state, clearing all counters and history.
    async fn reset(&self);
}
