//! Workers: the long-lived tasks that pull from a stage's input tube, apply a
//! [`Transform`], and publish to the stage's output tubes.
//!
//! Two disciplines share the stop-token aggregation protocol in this module
//! but differ in how they coordinate publication order:
//! [`ordered`] workers hand off turns through a [`ring::WorkerRing`] so pool
//! output order matches input order; [`unordered`] workers publish as soon as
//! their own computation finishes.

mod context;
mod ring;
pub mod ordered;
mod transform;
pub mod unordered;

pub use context::WorkerContext;
pub use transform::Transform;

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::envelope::Envelope;
use crate::monitoring::{Monitor, PipelineEvent, PipelineEventKind};
use crate::tube::{TubeReceiver, TubeSender};
use crate::util::StageId;

/// Spawn an entire worker pool for one stage: a ring-coordinated pool if
/// `ordered`, otherwise a set of independently racing workers.
#[allow(clippy::too_many_arguments)]
pub(crate) fn spawn_pool<V, T, M>(
    ordered: bool,
    pool_size: usize,
    input_rx: TubeReceiver<V>,
    input_tx: TubeSender<V>,
    outputs: Vec<TubeSender<V>>,
    transform: Arc<T>,
    monitor: M,
    stage_id: StageId,
    stage_name: String,
) -> Vec<JoinHandle<()>>
where
    V: Clone + Send + Sync + 'static,
    T: Transform<V> + ?Sized + 'static,
    M: Monitor<PipelineEvent> + 'static,
{
    if ordered {
        let ring = ring::WorkerRing::new(pool_size);
        (0..pool_size)
            .map(|i| {
                ordered::spawn(
                    i,
                    pool_size,
                    ring.slot(i),
                    input_rx.clone(),
                    input_tx.clone(),
                    outputs.clone(),
                    Arc::clone(&transform),
                    monitor.clone(),
                    stage_id,
                    stage_name.clone(),
                )
            })
            .collect()
    } else {
        (0..pool_size)
            .map(|i| {
                unordered::spawn(
                    i,
                    pool_size,
                    input_rx.clone(),
                    input_tx.clone(),
                    outputs.clone(),
                    Arc::clone(&transform),
                    monitor.clone(),
                    stage_id,
                    stage_name.clone(),
                )
            })
            .collect()
    }
}

/// Shared by both worker disciplines: fold one observed stop into the
/// stage's aggregation count, either forwarding it back onto the stage's own
/// input (if peers are still computing) or broadcasting the terminal stop to
/// every output edge (if this was the last peer).
pub(crate) async fn aggregate_stop<V, M>(
    count: usize,
    pool_size: usize,
    input_tx: &TubeSender<V>,
    outputs: &[TubeSender<V>],
    monitor: &M,
    stage_id: StageId,
    stage_name: &str,
) where
    V: Clone,
    M: Monitor<PipelineEvent>,
{
    let new_count = count + 1;
    monitor
        .record(PipelineEvent {
            timestamp: chrono::Utc::now(),
            stage_id,
            stage_name: stage_name.to_string(),
            kind: PipelineEventKind::StopAggregated {
                count: new_count,
                pool_size,
            },
        })
        .await;

    if new_count >= pool_size {
        for out in outputs {
            let _ = out.put(Envelope::Stop { count: 0 }).await;
        }
        monitor
            .record(PipelineEvent {
                timestamp: chrono::Utc::now(),
                stage_id,
                stage_name: stage_name.to_string(),
                kind: PipelineEventKind::StageDrained,
            })
            .await;
    } else {
        let _ = input_tx.put(Envelope::Stop { count: new_count }).await;
    }
}
