//! Utility types and helpers shared across the pipeline framework.

pub mod ids;
pub mod serde_helpers;

pub use ids::{StageId, WorkerId};
pub use serde_helpers::duration_serde;
