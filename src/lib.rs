//! # conveyor - Multi-Stage Parallel Processing Pipeline Framework
//!
//! A pipeline is a directed graph of stages; each stage is a pool of workers
//! pulling from a shared input tube and publishing to the next stage's tube
//! (or, for a leaf, a terminal tube the caller reads from). Two worker
//! disciplines are available per stage: ordered (a ring-coordinated pool that
//! preserves input order on every output edge) and unordered (workers race
//! for input and publish as soon as they finish).
//!
//! # Quick Start
//!
//! ```rust
//! use conveyor::pipeline::Pipeline;
//! use conveyor::stage::Stage;
//!
//! #[tokio::main]
//! async fn main() {
//!     let root = Stage::ordered(|x: i32| Some(x * x), 4).unwrap();
//!     let pipeline = Pipeline::new(root).unwrap();
//!
//!     for i in 1..=5 {
//!         pipeline.put(i).await.unwrap();
//!     }
//!     pipeline.stop().await.unwrap();
//!
//!     let mut results = Vec::new();
//!     let mut cursor = pipeline.results();
//!     while let Some(v) = cursor.next().await {
//!         results.push(v);
//!     }
//!     results.sort_unstable();
//!     assert_eq!(results, vec![1, 4, 9, 16, 25]);
//! }
//! ```
//!
//! # Core Features
//!
//! ## Two Worker Disciplines
//! - **Ordered**: a pool of `N` workers handed off turns through a ring of
//!   semaphores, so results leave in the same order tasks arrived.
//! - **Unordered**: workers race for the next item and publish immediately;
//!   output is a permutation of the input multiset.
//!
//! ## Typed Stop Propagation
//! - [`envelope::Envelope<V>`] tags every item as `Data` or `Stop` out of
//!   band, so `V` never needs a reserved sentinel value.
//! - Stop aggregation ensures exactly one terminal stop is emitted per output
//!   edge once every worker in a stage has observed it.
//!
//! ## DAG Assembly
//! - Stages [`stage::Stage::link`] into an arbitrary DAG (including fan-out to
//!   multiple downstream stages and fan-in from multiple upstream stages).
//! - [`stage::Stage::leaves`] performs a deduplicated depth-first walk to find
//!   every terminal stage once, even through a diamond-shaped graph.
//!
//! # Module Organization
//!
//! - [`envelope`] - The tagged `Data`/`Stop` payload carried on every tube
//! - [`tube`] - Point-to-point and multi-access channels connecting workers
//! - [`worker`] - The ordered and unordered worker protocols, and the
//!   `Transform` trait callers implement
//! - [`stage`] - One worker pool plus its downstream links
//! - [`pipeline`] - A built stage graph, read from as a single unit
//! - [`monitoring`] - Event tracking for observability
//! - [`util`] - Identifiers (`StageId`, `WorkerId`) and serde helpers
//!
//! # Architecture Principles
//!
//! ## Zero-Cost Observability
//! - [`monitoring::NoopMonitor`] compiles away completely; swap in
//!   [`monitoring::InMemoryMonitor`] only where history is needed.
//!
//! ## Thin Adapter, Not Subclassing
//! - Callers hand a [`worker::Transform`] value to `Stage::ordered`/
//!   `Stage::unordered` rather than implementing a worker type from scratch.
//!
//! ## Single Payload Type Per Pipeline
//! - One generic `V` threads through every stage of a `Pipeline<V>` instance;
//!   stages may still change what `V` means (e.g. `x + 1` then `x * 2`).

pub mod envelope;
pub mod monitoring;
pub mod pipeline;
pub mod stage;
pub mod tube;
pub mod util;
pub mod worker;

// Re-export commonly used types
pub use envelope::Envelope;
pub use monitoring::{
    EventSeverity, InMemoryMonitor, Monitor, MonitoringConfig, MonitoringSnapshot, NoopMonitor,
    PipelineEvent, PipelineEventKind,
};
pub use pipeline::{Pipeline, PipelineError, PipelineResults};
pub use stage::{Stage, StageConfig, StageError};
pub use tube::{PTube, PTubeReceiver, PTubeSender, QTube, QTubeReceiver, QTubeSender, TubeError};
pub use util::{StageId, WorkerId};
pub use worker::{Transform, WorkerContext};
