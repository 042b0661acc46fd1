use thiserror::Error;

use crate::Step;

/// Why a pipeline invocation stopped early.
///
/// `index` is the zero-based position of the failing step; no step after it ran.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError<E> {
    #[error("step {index} ({label}) failed: {source}")]
    StepExecution {
        index: usize,
        label: String,
        #[source]
        source: E,
    },
    #[error("asynchronous step {index} ({label}) failed: {source}")]
    AsyncStepFailure {
        index: usize,
        label: String,
        #[source]
        source: E,
    },
}

impl<E> PipelineError<E> {
    pub(crate) fn step_execution<T>(index: usize, step: &Step<T, E>, source: E) -> Self {
        PipelineError::StepExecution {
            index,
            label: step.label().to_string(),
            source,
        }
    }

    pub(crate) fn async_step<T>(index: usize, step: &Step<T, E>, source: E) -> Self {
        PipelineError::AsyncStepFailure {
            index,
            label: step.label().to_string(),
            source,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            PipelineError::StepExecution { index, .. }
            | PipelineError::AsyncStepFailure { index, .. } => *index,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            PipelineError::StepExecution { label, .. }
            | PipelineError::AsyncStepFailure { label, .. } => label,
        }
    }

    pub fn is_async(&self) -> bool {
        matches!(self, PipelineError::AsyncStepFailure { .. })
    }

    pub fn source_error(&self) -> &E {
        match self {
            PipelineError::StepExecution { source, .. }
            | PipelineError::AsyncStepFailure { source, .. } => source,
        }
    }

    pub fn into_source(self) -> E {
        match self {
            PipelineError::StepExecution { source, .. }
            | PipelineError::AsyncStepFailure { source, .. } => source,
        }
    }
}
