//! Point-to-point tube (P-tube): a hand-rolled pipe-like primitive.
//!
//! Intended for exactly-one-producer / exactly-one-consumer use. An ordered
//! stage uses this as its input tube because the worker ring externally
//! serializes every dequeue, so the "one consumer" assumption holds even
//! though every worker in the pool shares a clone of the receiver.
//!
//! The timed `get` is implemented as a poll (try to pop immediately) followed
//! by an async wait with a deadline — two separate steps, not one atomic
//! operation. Under a single consumer this is indistinguishable from atomic;
//! under concurrent timed readers it is not, and this module makes no attempt
//! to fix that. The only caller of the timed variant in this crate is
//! [`crate::pipeline::Pipeline::get_timeout`] against a leaf's single
//! consumer, so the assumption holds in practice.

// Layer 1: Standard library imports
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party crate imports
use parking_lot::Mutex;
use tokio::sync::{Notify, Semaphore};
use tokio::time::timeout;

// Layer 3: Internal module imports
use super::traits::TubeError;

struct Inner<T> {
    queue: Mutex<VecDeque<T>>,
    notify: Notify,
    /// `Some` caps the queue: a put acquires a permit before enqueuing and a
    /// get releases one after dequeuing. `None` means unbounded.
    capacity: Option<Arc<Semaphore>>,
}

/// Sending half of a [`PTube`].
pub struct PTubeSender<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for PTubeSender<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Receiving half of a [`PTube`]. Cheaply cloneable so every worker in an
/// ordered pool can hold a handle; the ring protocol is what keeps access to
/// the single logical consumer serialized.
pub struct PTubeReceiver<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for PTubeReceiver<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// A point-to-point tube, returned as its sender/receiver halves.
pub struct PTube;

impl PTube {
    /// Create a fresh, unbounded P-tube.
    pub fn channel<T>() -> (PTubeSender<T>, PTubeReceiver<T>) {
        Self::with_capacity(None)
    }

    /// Create a P-tube whose `put` blocks once `capacity` unconsumed items
    /// are queued. `None` is equivalent to [`PTube::channel`].
    pub fn with_capacity<T>(capacity: Option<usize>) -> (PTubeSender<T>, PTubeReceiver<T>) {
        let inner = Arc::new(Inner {
            queue: Mutex::new(VecDeque::new()),
            notify: Notify::new(),
            capacity: capacity.map(|n| Arc::new(Semaphore::new(n))),
        });
        (
            PTubeSender {
                inner: Arc::clone(&inner),
            },
            PTubeReceiver { inner },
        )
    }
}

impl<T> PTubeSender<T> {
    /// Enqueue an item, waiting for room first if the tube is bounded. Never
    /// fails: the tube's lifetime is tied to its own `Arc`, so there is no
    /// closed state to report.
    pub async fn put(&self, item: T) -> Result<(), TubeError> {
        if let Some(capacity) = &self.inner.capacity {
            if let Ok(permit) = capacity.acquire().await {
                permit.forget();
            }
        }
        self.inner.queue.lock().push_back(item);
        self.inner.notify.notify_one();
        Ok(())
    }
}

impl<T> PTubeReceiver<T> {
    fn try_pop(&self) -> Option<T> {
        let item = self.inner.queue.lock().pop_front();
        if item.is_some() {
            if let Some(capacity) = &self.inner.capacity {
                capacity.add_permits(1);
            }
        }
        item
    }

    /// Dequeue the next item, blocking until one is available.
    pub async fn get(&self) -> T {
        loop {
            if let Some(item) = self.try_pop() {
                return item;
            }
            let notified = self.inner.notify.notified();
            // Re-check after registering for notification to avoid missing a
            // put() that happened between the failed pop and this await.
            if let Some(item) = self.try_pop() {
                return item;
            }
            notified.await;
        }
    }

    /// Dequeue the next item, or give up after `duration`.
    ///
    /// This is the poll-then-wait sequence described in the module docs: a
    /// non-blocking pop, then a single bounded wait. Only safe to call from a
    /// single logical consumer.
    pub async fn get_timeout(&self, duration: Duration) -> Option<T> {
        if let Some(item) = self.try_pop() {
            return Some(item);
        }
        let notified = self.inner.notify.notified();
        match timeout(duration, notified).await {
            Ok(()) => self.try_pop(),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn put_then_get() {
        let (tx, rx) = PTube::channel::<i32>();
        tx.put(1).await.unwrap();
        tx.put(2).await.unwrap();
        assert_eq!(rx.get().await, 1);
        assert_eq!(rx.get().await, 2);
    }

    #[tokio::test]
    async fn get_blocks_until_put() {
        let (tx, rx) = PTube::channel::<i32>();
        let handle = tokio::spawn(async move { rx.get().await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        tx.put(7).await.unwrap();
        assert_eq!(handle.await.unwrap(), 7);
    }

    #[tokio::test]
    async fn get_timeout_returns_none_on_empty() {
        let (_tx, rx) = PTube::channel::<i32>();
        let result = rx.get_timeout(Duration::from_millis(20)).await;
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn get_timeout_does_not_corrupt_subsequent_get() {
        let (tx, rx) = PTube::channel::<i32>();
        let result = rx.get_timeout(Duration::from_millis(10)).await;
        assert_eq!(result, None);

        tx.put(99).await.unwrap();
        assert_eq!(rx.get().await, 99);
    }

    #[tokio::test]
    async fn fifo_order_preserved() {
        let (tx, rx) = PTube::channel::<i32>();
        for i in 0..10 {
            tx.put(i).await.unwrap();
        }
        for i in 0..10 {
            assert_eq!(rx.get().await, i);
        }
    }

    #[tokio::test]
    async fn bounded_put_blocks_until_room_is_freed() {
        let (tx, rx) = PTube::with_capacity::<i32>(Some(1));
        tx.put(1).await.unwrap();

        let tx2 = tx.clone();
        let handle = tokio::spawn(async move { tx2.put(2).await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!handle.is_finished());

        assert_eq!(rx.get().await, 1);
        handle.await.unwrap().unwrap();
        assert_eq!(rx.get().await, 2);
    }
}
