use std::fmt;
use std::future::IntoFuture;

use futures_util::future::{self, BoxFuture};
use futures_util::FutureExt;

use crate::PipelineError;

/// Future resolving to an invocation's outcome.
pub type PipelineFuture<T, E> = BoxFuture<'static, Result<T, PipelineError<E>>>;

/// The value threaded through a pipeline, as seen by the caller.
///
/// `Concrete` means every step ran synchronously and the outcome is already
/// known. `Pending` means some step returned a pending handle; everything after
/// it is chained onto that handle. A pending accumulator never becomes concrete
/// again until the caller awaits it.
pub enum Accumulator<T, E> {
    Concrete(Result<T, PipelineError<E>>),
    Pending(PipelineFuture<T, E>),
}

impl<T, E> Accumulator<T, E> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Accumulator::Pending(_))
    }

    pub fn is_concrete(&self) -> bool {
        matches!(self, Accumulator::Concrete(_))
    }

    /// Returns the outcome if it is already known, `None` if it is still pending.
    pub fn into_concrete(self) -> Option<Result<T, PipelineError<E>>> {
        match self {
            Accumulator::Concrete(outcome) => Some(outcome),
            Accumulator::Pending(_) => None,
        }
    }
}

impl<T, E> IntoFuture for Accumulator<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    type Output = Result<T, PipelineError<E>>;
    type IntoFuture = PipelineFuture<T, E>;

    fn into_future(self) -> Self::IntoFuture {
        match self {
            Accumulator::Concrete(outcome) => future::ready(outcome).boxed(),
            Accumulator::Pending(pending) => pending,
        }
    }
}

impl<T: fmt::Debug, E: fmt::Debug> fmt::Debug for Accumulator<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accumulator::Concrete(outcome) => f.debug_tuple("Concrete").field(outcome).finish(),
            Accumulator::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}
