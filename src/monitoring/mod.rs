//! # Monitoring Module
//!
//! Observability infrastructure for the pipeline's lifecycle: stage builds,
//! worker spawns, stop-token aggregation, and stage drain.
//!
//! ## Features
//! - **Generic `Monitor<E>` trait**: works with any event type, and never
//!   fails — a stopped pipeline should never depend on an event reaching
//!   its monitor.
//! - **Zero-cost option**: `NoopMonitor` compiles away when disabled
//! - **Bounded history**: `InMemoryMonitor` keeps a ring buffer of recent events
//!
//! ## Examples
//! ```
//! use conveyor::monitoring::{InMemoryMonitor, Monitor, MonitoringConfig, PipelineEvent, PipelineEventKind};
//! use conveyor::util::StageId;
//! use chrono::Utc;
//!
//! # async fn example() {
//! let monitor = InMemoryMonitor::new(MonitoringConfig::default());
//! monitor.record(PipelineEvent {
//!     timestamp: Utc::now(),
//!     stage_id: StageId::new(),
//!     stage_name: "square".to_string(),
//!     kind: PipelineEventKind::StageDrained,
//! }).await;
//! let snapshot = monitor.snapshot().await;
//! assert_eq!(snapshot.total_events, 1);
//! # }
//! ```

pub mod in_memory;
pub mod noop;
pub mod traits;
pub mod types;

pub use in_memory::InMemoryMonitor;
pub use noop::NoopMonitor;
pub use traits::{EventSeverity, Monitor, MonitoringEvent};
pub use types::{MonitoringConfig, MonitoringSnapshot, PipelineEvent, PipelineEventKind};
