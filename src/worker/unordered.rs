//! The unordered worker protocol: every worker in the pool races for the
//! next input item and publishes as soon as its own computation finishes, so
//! output is a permutation of the input rather than order-preserving.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
use tokio::task::JoinHandle;

// Layer 3: Internal module imports
use super::aggregate_stop;
use super::context::WorkerContext;
use super::transform::Transform;
use crate::envelope::Envelope;
use crate::monitoring::{Monitor, PipelineEvent, PipelineEventKind};
use crate::tube::{TubeReceiver, TubeSender};
use crate::util::{StageId, WorkerId};

/// Spawn one unordered worker.
#[allow(clippy::too_many_arguments)]
pub(crate) fn spawn<V, T, M>(
    index: usize,
    pool_size: usize,
    input_rx: TubeReceiver<V>,
    input_tx: TubeSender<V>,
    outputs: Vec<TubeSender<V>>,
    transform: Arc<T>,
    monitor: M,
    stage_id: StageId,
    stage_name: String,
) -> JoinHandle<()>
where
    V: Clone + Send + Sync + 'static,
    T: Transform<V> + ?Sized + 'static,
    M: Monitor<PipelineEvent> + 'static,
{
    tokio::spawn(async move {
        monitor
            .record(PipelineEvent {
                timestamp: chrono::Utc::now(),
                stage_id,
                stage_name: stage_name.clone(),
                kind: PipelineEventKind::WorkerSpawned {
                    worker_id: WorkerId::new(stage_id, index),
                },
            })
            .await;

        loop {
            let received = input_rx.get().await;
            let envelope = received.unwrap_or(Envelope::Stop { count: 0 });

            match envelope {
                Envelope::Stop { count } => {
                    aggregate_stop(
                        count, pool_size, &input_tx, &outputs, &monitor, stage_id, &stage_name,
                    )
                    .await;
                    break;
                }
                Envelope::Data(payload) => {
                    let ctx = WorkerContext::new();
                    let returned = transform.apply(payload, &ctx).await;
                    let mut results = ctx.take_pending();
                    if let Some(value) = returned {
                        results.push(value);
                    }

                    for result in &results {
                        for out in &outputs {
                            let _ = out.put(Envelope::Data(result.clone())).await;
                        }
                    }
                }
            }
        }
    })
}
