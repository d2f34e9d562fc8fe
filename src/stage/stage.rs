//! A stage: one stop-token-aware worker pool with zero or more downstream
//! links, wired and spawned once by [`Stage::build`].

// Layer 1: Standard library
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party
use parking_lot::Mutex;
use tokio::task::JoinHandle;

// Layer 3: Internal
use super::config::StageConfig;
use super::error::StageError;
use crate::envelope::Envelope;
use crate::monitoring::{Monitor, NoopMonitor, PipelineEvent, PipelineEventKind};
use crate::tube::{self, TubeReceiver, TubeSender};
use crate::util::StageId;
use crate::worker::{self, Transform};

/// One worker pool in a pipeline graph.
///
/// A stage owns its input tube from construction (so [`Stage::put`] works
/// immediately) but defers spawning workers until [`Stage::build`], since
/// the worker pool needs to know every downstream link first.
pub struct Stage<V, Mon = NoopMonitor<PipelineEvent>>
where
    V: Clone + Send + Sync + 'static,
    Mon: Monitor<PipelineEvent> + 'static,
{
    id: StageId,
    config: StageConfig,
    ordered: bool,
    pool_size: usize,
    transform: Arc<dyn Transform<V>>,
    monitor: Mon,
    input_tx: TubeSender<V>,
    input_rx: TubeReceiver<V>,
    downstream: Mutex<Vec<Arc<Stage<V, Mon>>>>,
    terminal: Mutex<Option<TubeReceiver<V>>>,
    built: AtomicBool,
    /// Worker task handles, kept alive so the pool is not detached from the
    /// stage; not otherwise inspected today.
    #[allow(dead_code)]
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl<V> Stage<V, NoopMonitor<PipelineEvent>>
where
    V: Clone + Send + Sync + 'static,
{
    /// Build an ordered stage with default configuration and no monitoring.
    pub fn ordered(
        transform: impl Transform<V> + 'static,
        pool_size: usize,
    ) -> Result<Arc<Self>, StageError> {
        Self::ordered_with(transform, pool_size, StageConfig::default(), NoopMonitor::new())
    }

    /// Build an unordered stage with default configuration and no monitoring.
    pub fn unordered(
        transform: impl Transform<V> + 'static,
        pool_size: usize,
    ) -> Result<Arc<Self>, StageError> {
        Self::unordered_with(transform, pool_size, StageConfig::default(), NoopMonitor::new())
    }
}

impl<V, Mon> Stage<V, Mon>
where
    V: Clone + Send + Sync + 'static,
    Mon: Monitor<PipelineEvent> + 'static,
{
    /// Build an ordered stage with an explicit configuration and monitor.
    pub fn ordered_with(
        transform: impl Transform<V> + 'static,
        pool_size: usize,
        config: StageConfig,
        monitor: Mon,
    ) -> Result<Arc<Self>, StageError> {
        Self::new(true, transform, pool_size, config, monitor)
    }

    /// Build an unordered stage with an explicit configuration and monitor.
    pub fn unordered_with(
        transform: impl Transform<V> + 'static,
        pool_size: usize,
        config: StageConfig,
        monitor: Mon,
    ) -> Result<Arc<Self>, StageError> {
        Self::new(false, transform, pool_size, config, monitor)
    }

    fn new(
        ordered: bool,
        transform: impl Transform<V> + 'static,
        pool_size: usize,
        config: StageConfig,
        monitor: Mon,
    ) -> Result<Arc<Self>, StageError> {
        if pool_size == 0 {
            return Err(StageError::ZeroPoolSize);
        }
        config.validate()?;

        let (input_tx, input_rx) = if ordered {
            tube::point_to_point_with_capacity(config.bounded_capacity)
        } else {
            tube::multi_access_with_capacity(config.bounded_capacity)
        };

        Ok(Arc::new(Self {
            id: StageId::new(),
            config,
            ordered,
            pool_size,
            transform: Arc::new(transform),
            monitor,
            input_tx,
            input_rx,
            downstream: Mutex::new(Vec::new()),
            terminal: Mutex::new(None),
            built: AtomicBool::new(false),
            handles: Mutex::new(Vec::new()),
        }))
    }

    /// This stage's identity, stable for its lifetime.
    pub fn id(&self) -> StageId {
        self.id
    }

    /// Enqueue one task.
    pub async fn put(&self, task: V) -> Result<(), StageError> {
        self.input_tx.put(Envelope::Data(task)).await?;
        Ok(())
    }

    /// Sugar for enqueuing the stop sentinel.
    pub async fn stop(&self) -> Result<(), StageError> {
        self.input_tx.put(Envelope::Stop { count: 0 }).await?;
        Ok(())
    }

    /// Read one payload from this stage's terminal tube, blocking until one
    /// is available. Only meaningful once `build()` has run and this stage
    /// has no downstream links (a leaf).
    pub async fn get(&self) -> Option<V> {
        let terminal = self.terminal.lock().clone();
        match terminal {
            Some(rx) => match rx.get().await {
                Some(Envelope::Data(v)) => Some(v),
                Some(Envelope::Stop { .. }) | None => None,
            },
            None => None,
        }
    }

    /// Read one payload from this stage's terminal tube, or give up after
    /// `duration`.
    pub async fn get_timeout(&self, duration: Duration) -> Option<V> {
        let terminal = self.terminal.lock().clone();
        match terminal {
            Some(rx) => match rx.get_timeout(duration).await {
                Some(Envelope::Data(v)) => Some(v),
                Some(Envelope::Stop { .. }) | None => None,
            },
            None => None,
        }
    }

    /// Link a downstream stage: every result this stage produces is also
    /// published to `downstream`'s input tube.
    ///
    /// Fails if this stage has already been built — the output graph is
    /// frozen at that point.
    pub fn link(&self, downstream: &Arc<Stage<V, Mon>>) -> Result<(), StageError> {
        if self.built.load(Ordering::SeqCst) {
            return Err(StageError::LinkAfterBuilt(self.id));
        }
        self.downstream.lock().push(Arc::clone(downstream));
        Ok(())
    }

    /// Depth-first, `StageId`-deduplicated set of stages with no downstream
    /// link — the stages whose terminal tubes carry final results.
    ///
    /// Takes `self` by an owned `Arc` (rather than `&self`) because a leaf
    /// stage contributes a clone of its own handle to the result; call it as
    /// `Arc::clone(&stage).leaves()` to keep `stage` usable afterward.
    pub fn leaves(self: Arc<Self>) -> Vec<Arc<Stage<V, Mon>>> {
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::new();
        self.collect_leaves(&mut seen, &mut out);
        out
    }

    fn collect_leaves(
        self: Arc<Self>,
        seen: &mut std::collections::HashSet<StageId>,
        out: &mut Vec<Arc<Stage<V, Mon>>>,
    ) {
        if !seen.insert(self.id) {
            return;
        }
        let downstream = self.downstream.lock().clone();
        if downstream.is_empty() {
            out.push(self);
        } else {
            for d in downstream {
                d.collect_leaves(seen, out);
            }
        }
    }

    /// Freeze the graph rooted at this stage and spawn every worker pool.
    ///
    /// One-shot: a second call on the same stage returns
    /// [`StageError::AlreadyBuilt`]. Recursing into a downstream stage that a
    /// different upstream already built (a DAG fan-in) is a no-op rather than
    /// an error, so a diamond-shaped graph can be built once from its root.
    pub fn build(&self) -> Result<(), StageError> {
        if self.built.swap(true, Ordering::SeqCst) {
            return Err(StageError::AlreadyBuilt(self.id));
        }
        self.build_inner()
    }

    fn build_inner(&self) -> Result<(), StageError> {
        let downstream = self.downstream.lock().clone();
        let outputs: Vec<TubeSender<V>> = if downstream.is_empty() {
            let (tx, rx) = if self.ordered {
                tube::point_to_point_with_capacity(self.config.bounded_capacity)
            } else {
                tube::multi_access_with_capacity(self.config.bounded_capacity)
            };
            *self.terminal.lock() = Some(rx);
            vec![tx]
        } else {
            downstream.iter().map(|d| d.input_tx.clone()).collect()
        };

        let handles = worker::spawn_pool(
            self.ordered,
            self.pool_size,
            self.input_rx.clone(),
            self.input_tx.clone(),
            outputs,
            Arc::clone(&self.transform),
            self.monitor.clone(),
            self.id,
            self.config.name.clone(),
        );
        *self.handles.lock() = handles;

        let monitor = self.monitor.clone();
        let stage_id = self.id;
        let stage_name = self.config.name.clone();
        let pool_size = self.pool_size;
        let ordered = self.ordered;
        tokio::spawn(async move {
            monitor
                .record(PipelineEvent {
                    timestamp: chrono::Utc::now(),
                    stage_id,
                    stage_name,
                    kind: PipelineEventKind::StageBuilt { pool_size, ordered },
                })
                .await;
        });

        for d in &downstream {
            if !d.built.swap(true, Ordering::SeqCst) {
                d.build_inner()?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_pool_size_is_rejected() {
        let result = Stage::ordered(|x: i32| Some(x), 0);
        assert!(matches!(result, Err(StageError::ZeroPoolSize)));
    }

    #[tokio::test]
    async fn link_after_build_is_rejected() {
        let root = Stage::ordered(|x: i32| Some(x), 1).unwrap();
        let tail = Stage::ordered(|x: i32| Some(x), 1).unwrap();
        root.build().unwrap();
        assert!(matches!(
            root.link(&tail),
            Err(StageError::LinkAfterBuilt(_))
        ));
    }

    #[tokio::test]
    async fn second_build_is_rejected() {
        let root = Stage::ordered(|x: i32| Some(x), 1).unwrap();
        root.build().unwrap();
        assert!(matches!(root.build(), Err(StageError::AlreadyBuilt(_))));
    }

    #[test]
    fn leaves_of_a_linear_chain_is_the_tail() {
        let root = Stage::ordered(|x: i32| Some(x), 1).unwrap();
        let tail = Stage::ordered(|x: i32| Some(x), 1).unwrap();
        root.link(&tail).unwrap();
        let leaves = Arc::clone(&root).leaves();
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].id(), tail.id());
    }

    #[test]
    fn leaves_dedup_a_diamond_shaped_graph() {
        let root = Stage::ordered(|x: i32| Some(x), 1).unwrap();
        let left = Stage::ordered(|x: i32| Some(x), 1).unwrap();
        let right = Stage::ordered(|x: i32| Some(x), 1).unwrap();
        let sink = Stage::ordered(|x: i32| Some(x), 1).unwrap();
        root.link(&left).unwrap();
        root.link(&right).unwrap();
        left.link(&sink).unwrap();
        right.link(&sink).unwrap();

        let leaves = Arc::clone(&root).leaves();
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].id(), sink.id());
    }

    #[tokio::test]
    async fn single_stage_round_trip() {
        let stage = Stage::ordered(|x: i32| Some(x * x), 2).unwrap();
        stage.build().unwrap();

        for i in 1..=4 {
            stage.put(i).await.unwrap();
        }
        stage.stop().await.unwrap();

        let mut results = Vec::new();
        while let Some(v) = stage.get_timeout(Duration::from_secs(1)).await {
            results.push(v);
        }
        results.sort_unstable();
        assert_eq!(results, vec![1, 4, 9, 16]);
    }
}
