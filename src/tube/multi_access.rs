//! Multi-access tube (Q-tube): a genuinely shared, multi-consumer queue.
//!
//! Backed by a `tokio::mpsc` channel, unbounded by default or bounded when a
//! [`crate::stage::StageConfig`] requests backpressure. Unlike
//! [`super::point_to_point`], the receiving half is wrapped in an async mutex
//! so that an entire unordered worker pool can hold a clone and race for the
//! next item without any ring token serializing access.

// Layer 1: Standard library imports
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party crate imports
use tokio::sync::{mpsc, Mutex};
use tokio::time::timeout;

// Layer 3: Internal module imports
use super::traits::TubeError;

enum Sender<T> {
    Bounded(mpsc::Sender<T>),
    Unbounded(mpsc::UnboundedSender<T>),
}

impl<T> Clone for Sender<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Bounded(tx) => Self::Bounded(tx.clone()),
            Self::Unbounded(tx) => Self::Unbounded(tx.clone()),
        }
    }
}

enum Receiver<T> {
    Bounded(mpsc::Receiver<T>),
    Unbounded(mpsc::UnboundedReceiver<T>),
}

impl<T> Receiver<T> {
    async fn recv(&mut self) -> Option<T> {
        match self {
            Self::Bounded(rx) => rx.recv().await,
            Self::Unbounded(rx) => rx.recv().await,
        }
    }
}

/// Sending half of a [`QTube`]. Cheaply cloneable; every producer into this
/// stage shares one.
pub struct QTubeSender<T> {
    inner: Sender<T>,
}

impl<T> Clone for QTubeSender<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Receiving half of a [`QTube`], shared across an entire worker pool.
pub struct QTubeReceiver<T> {
    inner: Arc<Mutex<Receiver<T>>>,
}

impl<T> Clone for QTubeReceiver<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// A multi-access tube, returned as its sender/receiver halves.
pub struct QTube;

impl QTube {
    /// Create a fresh, unbounded Q-tube.
    pub fn channel<T>() -> (QTubeSender<T>, QTubeReceiver<T>) {
        Self::with_capacity(None)
    }

    /// Create a Q-tube whose `put` blocks once `capacity` unconsumed items
    /// are queued. `None` is equivalent to [`QTube::channel`].
    pub fn with_capacity<T>(capacity: Option<usize>) -> (QTubeSender<T>, QTubeReceiver<T>) {
        match capacity {
            Some(n) => {
                let (tx, rx) = mpsc::channel(n.max(1));
                (
                    QTubeSender {
                        inner: Sender::Bounded(tx),
                    },
                    QTubeReceiver {
                        inner: Arc::new(Mutex::new(Receiver::Bounded(rx))),
                    },
                )
            }
            None => {
                let (tx, rx) = mpsc::unbounded_channel();
                (
                    QTubeSender {
                        inner: Sender::Unbounded(tx),
                    },
                    QTubeReceiver {
                        inner: Arc::new(Mutex::new(Receiver::Unbounded(rx))),
                    },
                )
            }
        }
    }
}

impl<T> QTubeSender<T> {
    /// Enqueue an item, waiting for room first if the tube is bounded. Fails
    /// only if every receiver handle has been dropped.
    pub async fn put(&self, item: T) -> Result<(), TubeError> {
        match &self.inner {
            Sender::Bounded(tx) => tx.send(item).await.map_err(|_| TubeError::Closed),
            Sender::Unbounded(tx) => tx.send(item).map_err(|_| TubeError::Closed),
        }
    }
}

impl<T> QTubeReceiver<T> {
    /// Dequeue the next item, blocking until one is available. Returns `None`
    /// once every sender has been dropped and the queue is drained.
    pub async fn get(&self) -> Option<T> {
        self.inner.lock().await.recv().await
    }

    /// Dequeue the next item, or give up after `duration`.
    ///
    /// `tokio::mpsc::Receiver::recv` is cancel-safe, so a timeout that elapses
    /// while waiting drops no item: the cancelled `recv` call simply never
    /// observed one.
    pub async fn get_timeout(&self, duration: Duration) -> Option<T> {
        let mut guard = self.inner.lock().await;
        timeout(duration, guard.recv()).await.ok().flatten()
    }
}
