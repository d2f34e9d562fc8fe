//! Pipelines: a built stage graph, read from as a single unit.

mod error;
#[allow(clippy::module_inception)]
mod pipeline;

pub use error::PipelineError;
pub use pipeline::{Pipeline, PipelineResults};
