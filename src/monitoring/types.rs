//! Monitoring event types and configuration structures.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::traits::{EventSeverity, MonitoringEvent};
use crate::util::{StageId, WorkerId};

/// Configuration for monitoring behavior.
///
/// Controls how events are recorded, filtered, and stored in the monitor.
#[derive(Debug, Clone, Serialize)]
pub struct MonitoringConfig {
    /// Whether monitoring is enabled.
    pub enabled: bool,

    /// Maximum number of events to keep in history.
    pub max_history_size: usize,

    /// Minimum severity level to record (events below this are filtered).
    pub severity_filter: EventSeverity,

    /// Interval for snapshot generation, if a caller polls on a timer.
    #[serde(with = "crate::util::duration_serde")]
    pub snapshot_interval: Duration,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_history_size: 1000,
            severity_filter: EventSeverity::Info,
            snapshot_interval: Duration::from_secs(60),
        }
    }
}

/// Snapshot of monitoring state at a point in time.
///
/// Provides queryable access to monitoring counters and recent event history.
#[derive(Debug, Clone, Serialize)]
pub struct MonitoringSnapshot<E: MonitoringEvent> {
    /// Timestamp when the snapshot was taken.
    pub timestamp: DateTime<Utc>,

    /// Total number of events recorded.
    pub total_events: u64,

    /// Number of trace-level events.
    pub trace_count: u64,

    /// Number of debug-level events.
    pub debug_count: u64,

    /// Number of info-level events.
    pub info_count: u64,

    /// Number of warning-level events.
    pub warning_count: u64,

    /// Number of error-level events.
    pub error_count: u64,

    /// Number of critical-level events.
    pub critical_count: u64,

    /// Recent events, up to `max_history_size`.
    pub recent_events: Vec<E>,
}

/// A single occurrence in a pipeline's lifecycle: a stage being built, a
/// worker spawning, a stop sentinel being aggregated, or a stage draining.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineEvent {
    /// Timestamp when the event occurred.
    pub timestamp: DateTime<Utc>,

    /// The stage this event concerns.
    pub stage_id: StageId,

    /// Stage name, for human-readable logs (see [`crate::stage::StageConfig`]).
    pub stage_name: String,

    /// What happened.
    pub kind: PipelineEventKind,
}

impl MonitoringEvent for PipelineEvent {
    const EVENT_TYPE: &'static str = "pipeline";

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn severity(&self) -> EventSeverity {
        match &self.kind {
            PipelineEventKind::StageBuilt { .. } => EventSeverity::Info,
            PipelineEventKind::WorkerSpawned { .. } => EventSeverity::Debug,
            PipelineEventKind::StopAggregated { count, pool_size } if count == pool_size => {
                EventSeverity::Info
            }
            PipelineEventKind::StopAggregated { .. } => EventSeverity::Trace,
            PipelineEventKind::StageDrained => EventSeverity::Info,
            PipelineEventKind::WorkerPanicked { .. } => EventSeverity::Critical,
        }
    }
}

/// Specific kinds of pipeline lifecycle events.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum PipelineEventKind {
    /// A stage finished assembling its worker pool and output tubes.
    StageBuilt {
        /// Number of workers spawned for this stage.
        pool_size: usize,
        /// Whether the stage uses the ordered ring protocol.
        ordered: bool,
    },
    /// One worker task started running.
    WorkerSpawned {
        /// The worker's identity: its owning stage plus its position within
        /// that stage's pool.
        worker_id: WorkerId,
    },
    /// A worker observed a stop sentinel and advanced the aggregation count.
    StopAggregated {
        /// Aggregation count after this worker's increment.
        count: usize,
        /// Total workers in the stage (the target count).
        pool_size: usize,
    },
    /// The stage has emitted its terminal stop on every output tube and every
    /// worker has exited.
    StageDrained,
    /// A worker's transform panicked; its slot in the pool is now permanently
    /// idle, since the ring does not route around a dead worker.
    WorkerPanicked {
        /// The worker's identity: its owning stage plus its position within
        /// that stage's pool.
        worker_id: WorkerId,
    },
}
