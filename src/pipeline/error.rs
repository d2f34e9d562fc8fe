//! Pipeline-level error types.

// Layer 1: Standard library
// (none)

// Layer 2: Third-party
use thiserror::Error;

// Layer 3: Internal
use crate::stage::StageError;

/// Pipeline-level errors.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The stage graph failed to build.
    #[error("failed to build pipeline graph: {0}")]
    Build(#[from] StageError),
}

impl PipelineError {
    /// Mirrors the wrapped [`StageError::is_fatal`].
    pub fn is_fatal(&self) -> bool {
        match self {
            PipelineError::Build(e) => e.is_fatal(),
        }
    }

    /// Mirrors the wrapped [`StageError::is_recoverable`].
    pub fn is_recoverable(&self) -> bool {
        !self.is_fatal()
    }
}
