//! Stage orchestration.

pub mod pipeline;
pub mod stage;

pub use pipeline::{Pipeline, PipelineOptions, PipelineReport};
pub use stage::{RunState, SkipReason, Stage, StageOutcome};
