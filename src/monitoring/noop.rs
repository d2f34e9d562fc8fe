//! No-operation monitor implementation with zero overhead.

use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::Utc;

use super::traits::{Monitor, MonitoringEvent};
use super::types::MonitoringSnapshot;

/// No-operation monitor that discards all events with zero overhead.
///
/// This is the monitor every [`crate::stage::Stage::ordered`] and
/// [`crate::stage::Stage::unordered`] convenience constructor uses, so a
/// pipeline built without an explicit monitor pays nothing for observability
/// it never asked for.
///
/// # Examples
///
/// ```
/// use conveyor::monitoring::{NoopMonitor, Monitor, PipelineEvent};
///
/// # async fn example() {
/// let monitor = NoopMonitor::<PipelineEvent>::new();
/// let snapshot = monitor.snapshot().await;
/// assert_eq!(snapshot.total_events, 0);
/// # }
/// ```
#[derive(Debug, Default)]
pub struct NoopMonitor<E: MonitoringEvent> {
    _phantom: PhantomData<E>,
}

impl<E: MonitoringEvent> Clone for NoopMonitor<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: MonitoringEvent> Copy for NoopMonitor<E> {}

impl<E: MonitoringEvent> NoopMonitor<E> {
    /// Creates a new no-operation monitor.
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

#[async_trait]
impl<E: MonitoringEvent> Monitor<E> for NoopMonitor<E> {
    #[inline(always)]
    async fn record(&self, _event: E) {}

    #[inline(always)]
    async fn snapshot(&self) -> MonitoringSnapshot<E> {
        MonitoringSnapshot {
            timestamp: Utc::now(),
            total_events: 0,
            trace_count: 0,
            debug_count: 0,
            info_count: 0,
            warning_count: 0,
            error_count: 0,
            critical_count: 0,
            recent_events: Vec::new(),
        }
    }

    #[inline(always)]
    async fn reset(&self) {}
}
