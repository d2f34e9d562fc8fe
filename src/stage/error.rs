//! Stage-level error types.

// Layer 1: Standard library
// (none)

// Layer 2: Third-party
use thiserror::Error;

// Layer 3: Internal
use crate::tube::TubeError;
use crate::util::StageId;

/// Stage-level errors.
///
/// Follows the M-ERRORS-CANONICAL-STRUCTS pattern: structured variants with
/// `#[source]`/`#[from]` where an inner error is wrapped, plus
/// `is_fatal`/`is_recoverable` helpers.
#[derive(Error, Debug)]
pub enum StageError {
    /// A pool of zero workers cannot make progress.
    #[error("stage pool size must be greater than zero")]
    ZeroPoolSize,

    /// `build()` called a second time on the same stage.
    #[error("stage {0} has already been built")]
    AlreadyBuilt(StageId),

    /// `link()` called after the stage was already built (the graph is
    /// frozen at that point).
    #[error("cannot link downstream stage: {0} has already been built")]
    LinkAfterBuilt(StageId),

    /// Configuration failed validation.
    #[error("stage configuration error: {0}")]
    Config(String),

    /// The underlying tube rejected an operation.
    #[error("tube error: {0}")]
    Tube(#[from] TubeError),
}

impl StageError {
    /// Configuration and sizing errors are caller mistakes, not transient
    /// runtime conditions.
    pub fn is_fatal(&self) -> bool {
        matches!(self, StageError::ZeroPoolSize | StageError::Config(_))
    }

    /// Everything that is not fatal can in principle be retried with a
    /// corrected call (e.g. linking before build instead of after).
    pub fn is_recoverable(&self) -> bool {
        !self.is_fatal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_pool_size_is_fatal() {
        let err = StageError::ZeroPoolSize;
        assert!(err.is_fatal());
        assert!(!err.is_recoverable());
    }

    #[test]
    fn already_built_is_recoverable() {
        let err = StageError::AlreadyBuilt(StageId::new());
        assert!(!err.is_fatal());
        assert!(err.is_recoverable());
    }

    #[test]
    fn link_after_built_display_includes_id() {
        let id = StageId::new();
        let err = StageError::LinkAfterBuilt(id);
        assert!(err.to_string().contains(&id.to_string()));
    }

    #[test]
    fn tube_error_converts_via_from() {
        let err: StageError = TubeError::Closed.into();
        assert!(matches!(err, StageError::Tube(TubeError::Closed)));
    }
}
