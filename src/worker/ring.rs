//! The semaphore rings that give an ordered worker pool input-order-preserving
//! output without serializing computation.
//!
//! Two independent rings connect a pool of `N` workers: `input_ring` hands off
//! the right to dequeue the next input item, `output_ring` hands off the right
//! to publish the next result. Each ring is `N` semaphores, one per directed
//! edge `i -> (i+1) mod N`. Every semaphore starts at 0 permits except the
//! wraparound edge `N-1 -> 0`, which starts at 1 so worker 0 does not block on
//! its first iteration.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
use tokio::sync::Semaphore;

// Layer 3: Internal module imports
// (none)

fn build_chain(pool_size: usize) -> Vec<Arc<Semaphore>> {
    (0..pool_size)
        .map(|i| Arc::new(Semaphore::new(usize::from(i == pool_size - 1))))
        .collect()
}

/// The four tokens one worker in the ring needs: its incoming and outgoing
/// edges on both the input ring and the output ring.
#[derive(Clone)]
pub(crate) struct RingSlot {
    pub(crate) prev_input: Arc<Semaphore>,
    pub(crate) next_input: Arc<Semaphore>,
    pub(crate) prev_output: Arc<Semaphore>,
    pub(crate) next_output: Arc<Semaphore>,
}

/// The two semaphore chains shared by an ordered pool, plus a method to slice
/// out each worker's slot.
pub(crate) struct WorkerRing {
    input: Vec<Arc<Semaphore>>,
    output: Vec<Arc<Semaphore>>,
}

impl WorkerRing {
    pub(crate) fn new(pool_size: usize) -> Self {
        Self {
            input: build_chain(pool_size),
            output: build_chain(pool_size),
        }
    }

    /// The slot for worker `index` in a ring of `self.input.len()` workers.
    pub(crate) fn slot(&self, index: usize) -> RingSlot {
        let n = self.input.len();
        let prev = (index + n - 1) % n;
        RingSlot {
            prev_input: Arc::clone(&self.input[prev]),
            next_input: Arc::clone(&self.input[index]),
            prev_output: Arc::clone(&self.output[prev]),
            next_output: Arc::clone(&self.output[index]),
        }
    }
}

/// Consume one permit from `sem`, waiting if none is available.
///
/// The ring's semaphores are never closed, so the error branch is
/// unreachable in practice; it is handled by proceeding rather than by
/// panicking.
pub(crate) async fn acquire_token(sem: &Semaphore) {
    if let Ok(permit) = sem.acquire().await {
        permit.forget();
    }
}

/// Hand the next worker in the ring its turn.
pub(crate) fn release_token(sem: &Semaphore) {
    sem.add_permits(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn worker_zero_does_not_block_first_iteration() {
        let ring = WorkerRing::new(3);
        let slot0 = ring.slot(0);
        // Worker 0's prev_input is edge 2 (N-1 -> 0), pre-loaded with 1 permit.
        let result = tokio::time::timeout(Duration::from_millis(50), acquire_token(&slot0.prev_input)).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn worker_one_blocks_until_worker_zero_releases() {
        let ring = WorkerRing::new(3);
        let slot0 = ring.slot(0);
        let slot1 = ring.slot(1);

        // Worker 1's prev_input is edge 0, which starts empty.
        let blocked = tokio::time::timeout(Duration::from_millis(20), acquire_token(&slot1.prev_input)).await;
        assert!(blocked.is_err());

        acquire_token(&slot0.prev_input).await;
        release_token(&slot0.next_input);

        let unblocked = tokio::time::timeout(Duration::from_millis(50), acquire_token(&slot1.prev_input)).await;
        assert!(unblocked.is_ok());
    }

    #[tokio::test]
    async fn ring_rotates_full_circle() {
        let ring = WorkerRing::new(4);
        for i in 0..4 {
            let slot = ring.slot(i);
            acquire_token(&slot.prev_input).await;
            release_token(&slot.next_input);
        }
        // Having gone once around, worker 0 should be able to proceed again.
        let slot0 = ring.slot(0);
        let result = tokio::time::timeout(Duration::from_millis(50), acquire_token(&slot0.prev_input)).await;
        assert!(result.is_ok());
    }
}
