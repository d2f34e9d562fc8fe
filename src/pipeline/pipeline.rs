//! A pipeline: a built stage graph plus its cached leaves, read from as a
//! single unit regardless of how many stages fan out underneath.

// Layer 1: Standard library
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party
// (none)

// Layer 3: Internal
use super::error::PipelineError;
use crate::monitoring::{Monitor, NoopMonitor, PipelineEvent};
use crate::stage::Stage;

/// A built pipeline graph rooted at one stage.
///
/// Single-shot: once [`Pipeline::stop`] drains every leaf, the graph cannot
/// be restarted — build a new one instead.
pub struct Pipeline<V, Mon = NoopMonitor<PipelineEvent>>
where
    V: Clone + Send + Sync + 'static,
    Mon: Monitor<PipelineEvent> + 'static,
{
    root: Arc<Stage<V, Mon>>,
    leaves: Vec<Arc<Stage<V, Mon>>>,
}

impl<V, Mon> Pipeline<V, Mon>
where
    V: Clone + Send + Sync + 'static,
    Mon: Monitor<PipelineEvent> + 'static,
{
    /// Freeze and spawn the graph rooted at `root`, caching its leaves.
    pub fn new(root: Arc<Stage<V, Mon>>) -> Result<Self, PipelineError> {
        root.build()?;
        let leaves = Arc::clone(&root).leaves();
        Ok(Self { root, leaves })
    }

    /// Enqueue one task at the root.
    pub async fn put(&self, task: V) -> Result<(), PipelineError> {
        self.root.put(task).await.map_err(Into::into)
    }

    /// Sugar for enqueuing the stop sentinel at the root.
    pub async fn stop(&self) -> Result<(), PipelineError> {
        self.root.stop().await.map_err(Into::into)
    }

    /// Read one payload from each leaf, returning the last one read.
    ///
    /// Blocks on each leaf in turn, so a leaf that never produces again
    /// (already stopped) blocks forever here; prefer [`Pipeline::results`]
    /// once any leaf may have stopped.
    pub async fn get(&self) -> Option<V> {
        let mut last = None;
        for leaf in &self.leaves {
            if let Some(v) = leaf.get().await {
                last = Some(v);
            }
        }
        last
    }

    /// Read one payload from each leaf with a shared timeout, returning the
    /// last one read.
    pub async fn get_timeout(&self, duration: Duration) -> Option<V> {
        let mut last = None;
        for leaf in &self.leaves {
            if let Some(v) = leaf.get_timeout(duration).await {
                last = Some(v);
            }
        }
        last
    }

    /// Read one payload from every leaf, collecting all of them instead of
    /// just the last.
    pub async fn get_all(&self) -> Vec<V> {
        let mut out = Vec::with_capacity(self.leaves.len());
        for leaf in &self.leaves {
            if let Some(v) = leaf.get().await {
                out.push(v);
            }
        }
        out
    }

    /// A cursor over every leaf's output, round-robin, ending once every
    /// leaf has observed a stop.
    pub fn results(&self) -> PipelineResults<V, Mon> {
        PipelineResults {
            leaves: self.leaves.clone(),
            done: vec![false; self.leaves.len()],
            cursor: 0,
        }
    }

    /// The root stage, for callers that need direct access (e.g. linking
    /// more stages before the graph is built is no longer possible once
    /// wrapped in a `Pipeline`, but the handle is still useful for
    /// introspection).
    pub fn root(&self) -> &Arc<Stage<V, Mon>> {
        &self.root
    }
}

/// Cursor returned by [`Pipeline::results`].
pub struct PipelineResults<V, Mon>
where
    V: Clone + Send + Sync + 'static,
    Mon: Monitor<PipelineEvent> + 'static,
{
    leaves: Vec<Arc<Stage<V, Mon>>>,
    done: Vec<bool>,
    cursor: usize,
}

impl<V, Mon> PipelineResults<V, Mon>
where
    V: Clone + Send + Sync + 'static,
    Mon: Monitor<PipelineEvent> + 'static,
{
    /// Yield the next payload across every leaf, or `None` once every leaf
    /// has observed its stop.
    pub async fn next(&mut self) -> Option<V> {
        if self.leaves.is_empty() {
            return None;
        }
        loop {
            if self.done.iter().all(|&d| d) {
                return None;
            }
            let idx = self.cursor;
            self.cursor = (self.cursor + 1) % self.leaves.len();
            if self.done[idx] {
                continue;
            }
            match self.leaves[idx].get().await {
                Some(v) => return Some(v),
                None => {
                    self.done[idx] = true;
                    continue;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[tokio::test]
    async fn single_stage_pipeline_round_trip() {
        let root = Stage::ordered(|x: i32| Some(x * x), 2).unwrap();
        let pipeline = Pipeline::new(root).unwrap();

        for i in 1..=5 {
            pipeline.put(i).await.unwrap();
        }
        pipeline.stop().await.unwrap();

        let mut results = Vec::new();
        let mut cursor = pipeline.results();
        while let Some(v) = cursor.next().await {
            results.push(v);
        }
        results.sort_unstable();
        assert_eq!(results, vec![1, 4, 9, 16, 25]);
    }

    #[tokio::test]
    async fn two_stage_chain_applies_both_transforms_in_order() {
        let root = Stage::ordered(|x: i32| Some(x + 1), 2).unwrap();
        let tail = Stage::ordered(|x: i32| Some(x * 2), 2).unwrap();
        root.link(&tail).unwrap();
        let pipeline = Pipeline::new(root).unwrap();

        for i in 1..=4 {
            pipeline.put(i).await.unwrap();
        }
        pipeline.stop().await.unwrap();

        let mut results = Vec::new();
        let mut cursor = pipeline.results();
        while let Some(v) = cursor.next().await {
            results.push(v);
        }
        assert_eq!(results, vec![4, 6, 8, 10]);
    }

    #[tokio::test]
    async fn fan_out_duplicates_the_stream_to_every_downstream() {
        let root = Stage::ordered(|x: i32| Some(x), 1).unwrap();
        let left = Stage::ordered(|x: i32| Some(x + 100), 1).unwrap();
        let right = Stage::ordered(|x: i32| Some(x + 200), 1).unwrap();
        root.link(&left).unwrap();
        root.link(&right).unwrap();
        let pipeline = Pipeline::new(root).unwrap();

        for i in 1..=3 {
            pipeline.put(i).await.unwrap();
        }
        pipeline.stop().await.unwrap();

        let mut results = HashSet::new();
        let mut cursor = pipeline.results();
        while let Some(v) = cursor.next().await {
            results.insert(v);
        }
        let expected: HashSet<i32> = [101, 102, 103, 201, 202, 203].into_iter().collect();
        assert_eq!(results, expected);
    }

    #[tokio::test]
    async fn get_timeout_returns_none_with_nothing_enqueued() {
        let root = Stage::ordered(|x: i32| Some(x), 1).unwrap();
        let pipeline = Pipeline::new(root).unwrap();
        let result = pipeline.get_timeout(Duration::from_millis(20)).await;
        assert_eq!(result, None);
    }
}
