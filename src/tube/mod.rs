//! Tubes: the channels that connect workers to each other.
//!
//! Two concrete flavors exist, matching the two worker disciplines:
//!
//! - [`PTube`](point_to_point::PTube) — a point-to-point pipe used between an
//!   ordered worker's ring partners, and as the input side of an ordered
//!   stage where the ring externally serializes access to a single logical
//!   consumer.
//! - [`QTube`](multi_access::QTube) — a genuinely shared multi-consumer queue
//!   used as the input side of an unordered stage, where every worker in the
//!   pool races for the next item.
//!
//! Both are exposed through the [`TubeSender`]/[`TubeReceiver`] enums so a
//! [`crate::stage::Stage`] can hold either kind without a generic parameter.
//! Both default to unbounded; [`crate::stage::StageConfig::bounded_capacity`]
//! opts a stage into backpressure while still preserving FIFO.

mod multi_access;
mod point_to_point;
mod traits;

pub use multi_access::{QTube, QTubeReceiver, QTubeSender};
pub use point_to_point::{PTube, PTubeReceiver, PTubeSender};
pub use traits::TubeError;

use std::time::Duration;

use crate::envelope::Envelope;

/// The sending half of either tube flavor.
pub enum TubeSender<V> {
    /// Point-to-point sender.
    Point(PTubeSender<Envelope<V>>),
    /// Multi-access sender.
    Multi(QTubeSender<Envelope<V>>),
}

impl<V> Clone for TubeSender<V> {
    fn clone(&self) -> Self {
        match self {
            Self::Point(s) => Self::Point(s.clone()),
            Self::Multi(s) => Self::Multi(s.clone()),
        }
    }
}

impl<V> TubeSender<V> {
    /// Enqueue an envelope on the underlying tube, waiting for room first if
    /// the tube is bounded.
    pub async fn put(&self, item: Envelope<V>) -> Result<(), TubeError> {
        match self {
            Self::Point(s) => s.put(item).await,
            Self::Multi(s) => s.put(item).await,
        }
    }
}

/// The receiving half of either tube flavor.
pub enum TubeReceiver<V> {
    /// Point-to-point receiver.
    Point(PTubeReceiver<Envelope<V>>),
    /// Multi-access receiver.
    Multi(QTubeReceiver<Envelope<V>>),
}

impl<V> Clone for TubeReceiver<V> {
    fn clone(&self) -> Self {
        match self {
            Self::Point(r) => Self::Point(r.clone()),
            Self::Multi(r) => Self::Multi(r.clone()),
        }
    }
}

impl<V> TubeReceiver<V> {
    /// Dequeue the next envelope, blocking until one is available.
    ///
    /// A multi-access tube returns `None` once every sender has dropped and
    /// the queue is drained; a point-to-point tube's sender lifetime is tied
    /// to the receiver via a shared `Arc`, so it never observes that state.
    pub async fn get(&self) -> Option<Envelope<V>> {
        match self {
            Self::Point(r) => Some(r.get().await),
            Self::Multi(r) => r.get().await,
        }
    }

    /// Dequeue the next envelope, or give up after `duration`.
    pub async fn get_timeout(&self, duration: Duration) -> Option<Envelope<V>> {
        match self {
            Self::Point(r) => r.get_timeout(duration).await,
            Self::Multi(r) => r.get_timeout(duration).await,
        }
    }
}

/// Construct a point-to-point tube pair, already wrapped in the tube enums.
pub fn point_to_point<V>() -> (TubeSender<V>, TubeReceiver<V>) {
    point_to_point_with_capacity(None)
}

/// Construct a point-to-point tube pair with an optional bounded capacity.
pub fn point_to_point_with_capacity<V>(
    capacity: Option<usize>,
) -> (TubeSender<V>, TubeReceiver<V>) {
    let (tx, rx) = PTube::with_capacity::<Envelope<V>>(capacity);
    (TubeSender::Point(tx), TubeReceiver::Point(rx))
}

/// Construct a multi-access tube pair, already wrapped in the tube enums.
pub fn multi_access<V>() -> (TubeSender<V>, TubeReceiver<V>) {
    multi_access_with_capacity(None)
}

/// Construct a multi-access tube pair with an optional bounded capacity.
pub fn multi_access_with_capacity<V>(capacity: Option<usize>) -> (TubeSender<V>, TubeReceiver<V>) {
    let (tx, rx) = QTube::with_capacity::<Envelope<V>>(capacity);
    (TubeSender::Multi(tx), TubeReceiver::Multi(rx))
}
