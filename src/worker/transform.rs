//! The caller-supplied per-task mapping every worker applies.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use async_trait::async_trait;

// Layer 3: Internal module imports
use super::context::WorkerContext;

/// A task-to-result mapping applied by every worker in a stage's pool.
///
/// Implementations may either return `Some(result)` — published to every
/// output tube after the call returns — or call
/// [`WorkerContext::put_result`] zero, one, or many times through `ctx` and
/// return `None`. Returning `None` without ever calling `put_result`
/// consumes the input without producing output.
#[async_trait]
pub trait Transform<V>: Send + Sync {
    /// Apply the mapping to one input value.
    async fn apply(&self, input: V, ctx: &WorkerContext<V>) -> Option<V>;
}

#[async_trait]
impl<V, F> Transform<V> for F
where
    F: Fn(V) -> Option<V> + Send + Sync,
    V: Send + 'static,
{
    async fn apply(&self, input: V, _ctx: &WorkerContext<V>) -> Option<V> {
        (self)(input)
    }
}
