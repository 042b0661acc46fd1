//! Composer core: effectful pipeline composition.
//!
//! A [`Pipeline`] threads one value through an ordered list of [`Step`]s. Steps
//! may be pure or side effects, synchronous or asynchronous; the pipeline finds
//! out at run time from each [`StepResult`] and switches to asynchronous mode
//! for good once any step hands back a pending result.
mod accumulator;
mod error;
mod logger;
mod pipeline;
mod step;
mod trace;

pub use accumulator::{Accumulator, PipelineFuture};
pub use error::PipelineError;
pub use logger::make_logger;
pub use pipeline::{compose, Pipeline};
pub use step::{PendingStep, Step, StepResult, StepValue};
pub use trace::Trace;
