//! Per-invocation handle a [`crate::worker::Transform`] uses to publish
//! results explicitly instead of (or in addition to) returning one.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use parking_lot::Mutex;

// Layer 3: Internal module imports
// (none)

/// Buffers explicit [`WorkerContext::put_result`] calls made during one
/// transform invocation.
///
/// For an ordered worker, the buffered results are flushed — in call order —
/// under the same output-ring token a single returned value would use, so
/// explicit publishing does not break the ordering guarantee.
pub struct WorkerContext<V> {
    pending: Mutex<Vec<V>>,
}

impl<V> WorkerContext<V> {
    pub(crate) fn new() -> Self {
        Self {
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Publish a result. May be called zero, one, or many times during a
    /// single transform invocation.
    pub fn put_result(&self, value: V) {
        self.pending.lock().push(value);
    }

    pub(crate) fn take_pending(&self) -> Vec<V> {
        std::mem::take(&mut *self.pending.lock())
    }
}

impl<V> Default for WorkerContext<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_result_accumulates_in_call_order() {
        let ctx: WorkerContext<i32> = WorkerContext::new();
        ctx.put_result(1);
        ctx.put_result(2);
        ctx.put_result(3);
        assert_eq!(ctx.take_pending(), vec![1, 2, 3]);
    }

    #[test]
    fn take_pending_drains_the_buffer() {
        let ctx: WorkerContext<i32> = WorkerContext::new();
        ctx.put_result(1);
        assert_eq!(ctx.take_pending(), vec![1]);
        assert_eq!(ctx.take_pending(), Vec::<i32>::new());
    }
}
