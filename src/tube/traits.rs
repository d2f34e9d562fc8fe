//! Shared error types for tube implementations.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
// (none)

/// Errors that can occur sending on a tube.
///
/// A tube is documented as "never fails on a healthy tube"; the only failure
/// mode is a bounded tube whose receiver has already been dropped.
#[derive(Debug, Error)]
pub enum TubeError {
    /// The tube's receiving half has been dropped; there is nowhere for the
    /// item to go.
    #[error("tube is closed")]
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_error_message() {
        assert_eq!(TubeError::Closed.to_string(), "tube is closed");
    }
}
