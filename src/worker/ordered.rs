//! The ordered worker protocol: a pool of `N` workers wired into a ring so
//! that, per output tube, results leave in the same order tasks arrived.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
use tokio::task::JoinHandle;

// Layer 3: Internal module imports
use super::context::WorkerContext;
use super::ring::{acquire_token, release_token, RingSlot};
use super::transform::Transform;
use super::aggregate_stop;
use crate::envelope::Envelope;
use crate::monitoring::{Monitor, PipelineEvent, PipelineEventKind};
use crate::tube::{TubeReceiver, TubeSender};
use crate::util::{StageId, WorkerId};

/// Spawn one ordered worker. Returns immediately; the worker runs until it
/// observes and fully participates in stop-token aggregation.
#[allow(clippy::too_many_arguments)]
pub(crate) fn spawn<V, T, M>(
    index: usize,
    pool_size: usize,
    slot: RingSlot,
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
            acquire_token(&slot.prev_input).await;
            let received = input_rx.get().await;
            release_token(&slot.next_input);

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

                    acquire_token(&slot.prev_output).await;
                    for result in &results {
                        for out in &outputs {
                            let _ = out.put(Envelope::Data(result.clone())).await;
                        }
                    }
                    release_token(&slot.next_output);
                }
            }
        }
    })
}
