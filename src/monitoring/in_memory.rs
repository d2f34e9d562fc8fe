//! In-memory monitor implementation with lock-free atomic counters.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use super::traits::{EventSeverity, Monitor, MonitoringEvent};
use super::types::{MonitoringConfig, MonitoringSnapshot};

/// In-memory monitor implementation with lock-free atomic counters.
///
/// Counts every recorded event by severity in a fixed-size atomic array and
/// keeps a bounded ring buffer of the most recent events for inspection.
/// Cloning shares the same counters and buffer through an inner `Arc`.
///
/// # Examples
///
/// ```
/// use conveyor::monitoring::{InMemoryMonitor, Monitor, MonitoringConfig, PipelineEvent, PipelineEventKind};
/// use conveyor::util::StageId;
/// use chrono::Utc;
///
/// # async fn example() {
/// let monitor = InMemoryMonitor::new(MonitoringConfig::default());
/// let event = PipelineEvent {
///     timestamp: Utc::now(),
///     stage_id: StageId::new(),
///     stage_name: "square".to_string(),
///     kind: PipelineEventKind::StageDrained,
/// };
/// monitor.record(event).await;
///
/// let snapshot = monitor.snapshot().await;
/// assert_eq!(snapshot.total_events, 1);
/// # }
/// ```
#[derive(Debug)]
pub struct InMemoryMonitor<E: MonitoringEvent> {
    inner: Arc<InMemoryMonitorInner<E>>,
}

#[derive(Debug)]
struct InMemoryMonitorInner<E: MonitoringEvent> {
    config: MonitoringConfig,
    total_events: AtomicU64,
    severity_counts: [AtomicU64; EventSeverity::COUNT],
    history: RwLock<VecDeque<E>>,
}

impl<E: MonitoringEvent> InMemoryMonitor<E> {
    /// Creates a new in-memory monitor with the given configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use conveyor::monitoring::{InMemoryMonitor, MonitoringConfig, PipelineEvent};
    ///
    /// let config = MonitoringConfig::default();
    /// let monitor = InMemoryMonitor::<PipelineEvent>::new(config);
    /// ```
    pub fn new(config: MonitoringConfig) -> Self {
        Self {
            inner: Arc::new(InMemoryMonitorInner {
                config,
                total_events: AtomicU64::new(0),
                severity_counts: std::array::from_fn(|_| AtomicU64::new(0)),
                history: RwLock::new(VecDeque::new()),
            }),
        }
    }

    fn count_for(&self, severity: EventSeverity) -> u64 {
        self.inner.severity_counts[severity.index()].load(Ordering::Relaxed)
    }
}

impl<E: MonitoringEvent> Clone for InMemoryMonitor<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl<E: MonitoringEvent> Monitor<E> for InMemoryMonitor<E> {
    async fn record(&self, event: E) {
        if !self.inner.config.enabled {
            return;
        }

        let severity = event.severity();
        if severity < self.inner.config.severity_filter {
            return;
        }

        self.inner.total_events.fetch_add(1, Ordering::Relaxed);
        self.inner.severity_counts[severity.index()].fetch_add(1, Ordering::Relaxed);

        let mut history = self.inner.history.write();
        if history.len() >= self.inner.config.max_history_size {
            history.pop_front();
        }
        history.push_back(event);
    }

    async fn snapshot(&self) -> MonitoringSnapshot<E> {
        MonitoringSnapshot {
            timestamp: Utc::now(),
            total_events: self.inner.total_events.load(Ordering::Relaxed),
            trace_count: self.count_for(EventSeverity::Trace),
            debug_count: self.count_for(EventSeverity::Debug),
            info_count: self.count_for(EventSeverity::Info),
            warning_count: self.count_for(EventSeverity::Warning),
            error_count: self.count_for(EventSeverity::Error),
            critical_count: self.count_for(EventSeverity::Critical),
            recent_events: self.inner.history.read().iter().cloned().collect(),
        }
    }

    async fn reset(&self) {
        self.inner.total_events.store(0, Ordering::Relaxed);
        for counter in &self.inner.severity_counts {
            counter.store(0, Ordering::Relaxed);
        }
        self.inner.history.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitoring::types::{PipelineEvent, PipelineEventKind};
    use crate::util::StageId;

    fn event(kind: PipelineEventKind) -> PipelineEvent {
        PipelineEvent {
            timestamp: Utc::now(),
            stage_id: StageId::new(),
            stage_name: "test-stage".to_string(),
            kind,
        }
    }

    fn stage_built_event() -> PipelineEvent {
        event(PipelineEventKind::StageBuilt {
            pool_size: 1,
            ordered: true,
        })
    }

    #[tokio::test]
    async fn fresh_monitor_has_an_empty_snapshot() {
        let monitor = InMemoryMonitor::<PipelineEvent>::new(MonitoringConfig::default());
        let snapshot = monitor.snapshot().await;
        assert_eq!(snapshot.total_events, 0);
        assert!(snapshot.recent_events.is_empty());
    }

    #[tokio::test]
    async fn recording_increments_total_and_severity_counters() {
        let monitor = InMemoryMonitor::new(MonitoringConfig::default());
        for _ in 0..10 {
            monitor.record(stage_built_event()).await;
        }
        let snapshot = monitor.snapshot().await;
        assert_eq!(snapshot.total_events, 10);
        assert_eq!(snapshot.info_count, 10);
        assert_eq!(snapshot.recent_events.len(), 10);
    }

    #[tokio::test]
    async fn severity_filter_drops_events_below_the_threshold() {
        let config = MonitoringConfig {
            severity_filter: EventSeverity::Critical,
            ..MonitoringConfig::default()
        };
        let monitor = InMemoryMonitor::new(config);

        monitor.record(stage_built_event()).await; // Info: filtered out.
        monitor
            .record(event(PipelineEventKind::WorkerPanicked {
                worker_id: crate::util::WorkerId::new(StageId::new(), 0),
            }))
            .await; // Critical: recorded.

        let snapshot = monitor.snapshot().await;
        assert_eq!(snapshot.total_events, 1);
        assert_eq!(snapshot.critical_count, 1);
        assert_eq!(snapshot.info_count, 0);
    }

    #[tokio::test]
    async fn ring_buffer_caps_history_but_not_the_total_counter() {
        let config = MonitoringConfig {
            max_history_size: 5,
            ..MonitoringConfig::default()
        };
        let monitor = InMemoryMonitor::new(config);

        for _ in 0..10 {
            monitor.record(stage_built_event()).await;
        }

        let snapshot = monitor.snapshot().await;
        assert_eq!(snapshot.total_events, 10);
        assert_eq!(snapshot.recent_events.len(), 5);
    }

    #[tokio::test]
    async fn reset_clears_counters_and_history() {
        let monitor = InMemoryMonitor::new(MonitoringConfig::default());
        for _ in 0..5 {
            monitor.record(stage_built_event()).await;
        }

        monitor.reset().await;

        let snapshot = monitor.snapshot().await;
        assert_eq!(snapshot.total_events, 0);
        assert!(snapshot.recent_events.is_empty());
    }

    #[tokio::test]
    async fn disabled_monitor_records_nothing() {
        let config = MonitoringConfig {
            enabled: false,
            ..MonitoringConfig::default()
        };
        let monitor = InMemoryMonitor::new(config);
        monitor.record(stage_built_event()).await;
        assert_eq!(monitor.snapshot().await.total_events, 0);
    }

    #[tokio::test]
    async fn clones_share_the_same_underlying_counters() {
        let monitor1 = InMemoryMonitor::new(MonitoringConfig::default());
        let monitor2 = monitor1.clone();

        monitor1.record(stage_built_event()).await;
        monitor2.record(stage_built_event()).await;

        assert_eq!(monitor1.snapshot().await.total_events, 2);
        assert_eq!(monitor2.snapshot().await.total_events, 2);
    }

    #[tokio::test]
    async fn concurrent_recording_from_a_worker_pool_loses_no_events() {
        let monitor = InMemoryMonitor::new(MonitoringConfig::default());

        let mut handles = Vec::new();
        for _ in 0..10 {
            let monitor = monitor.clone();
            handles.push(tokio::spawn(async move {
                for _ in 0..10 {
                    monitor.record(stage_built_event()).await;
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(monitor.snapshot().await.total_events, 100);
    }
}
