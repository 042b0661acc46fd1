use std::fmt;
use std::future::IntoFuture;
use std::sync::Arc;

use composer_logging::{composer_debug, composer_trace};

use crate::accumulator::{Accumulator, PipelineFuture};
use crate::step::{PendingStep, Step, StepResult, StepValue};
use crate::trace::{History, Recorder, Trace, Untracked};
use crate::PipelineError;

/// Builds a pipeline that runs `steps` left to right.
pub fn compose<T, E>(steps: Vec<Step<T, E>>) -> Pipeline<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    Pipeline::new(steps)
}

/// An ordered, immutable sequence of steps.
///
/// Cloning is cheap and shares the steps. Each invocation owns its accumulator,
/// so one pipeline may be invoked from many tasks at once.
pub struct Pipeline<T, E> {
    steps: Arc<[Step<T, E>]>,
}

impl<T, E> Pipeline<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    pub fn new(steps: Vec<Step<T, E>>) -> Self {
        Self {
            steps: steps.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.steps.iter().map(Step::label)
    }

    /// Runs the pipeline on `input`.
    ///
    /// Synchronous steps run before this returns. If every step was synchronous
    /// the result is [`Accumulator::Concrete`]; as soon as one step returns a
    /// pending handle the rest of the chain is attached to it and the result is
    /// [`Accumulator::Pending`].
    pub fn evaluate(&self, input: T) -> Accumulator<T, E> {
        self.run(input, Untracked)
    }

    /// Runs the pipeline and always hands back a future, whatever mode the
    /// steps ran in.
    pub fn call(&self, input: T) -> PipelineFuture<T, E> {
        self.evaluate(input).into_future()
    }

    fn run<H: History<T>>(&self, input: T, mut history: H) -> Accumulator<H::Output, E> {
        history.record(&input);
        let mut acc = input;
        for (index, step) in self.steps.iter().enumerate() {
            composer_trace!("running step {} ({})", index, step.label());
            match step.invoke(&acc) {
                StepResult::Ready(outcome) => match settle(acc, outcome, &mut history) {
                    Ok(next) => acc = next,
                    Err(source) => {
                        composer_debug!("step {} ({}) failed", index, step.label());
                        return Accumulator::Concrete(Err(PipelineError::step_execution(
                            index, step, source,
                        )));
                    }
                },
                StepResult::Pending(pending) => {
                    composer_debug!(
                        "step {} ({}) is pending; {} remaining step(s) wait for it",
                        index,
                        step.label(),
                        self.steps.len() - index - 1
                    );
                    let steps = Arc::clone(&self.steps);
                    return Accumulator::Pending(Box::pin(resume(
                        steps, index, acc, pending, history,
                    )));
                }
            }
        }
        Accumulator::Concrete(Ok(history.finish(acc)))
    }
}

impl<T, E> Pipeline<T, E>
where
    T: Clone + Send + 'static,
    E: Send + 'static,
{
    /// Like [`Pipeline::evaluate`], also recording the input and every value a
    /// step produced.
    pub fn evaluate_tracked(&self, input: T) -> Accumulator<Trace<T>, E> {
        self.run(input, Recorder::new())
    }

    pub fn call_tracked(&self, input: T) -> PipelineFuture<Trace<T>, E> {
        self.evaluate_tracked(input).into_future()
    }
}

/// Continues a chain after step `suspended_at` returned `pending`.
///
/// Every later step runs against the resolved value, synchronous or not.
async fn resume<T, E, H>(
    steps: Arc<[Step<T, E>]>,
    suspended_at: usize,
    acc: T,
    pending: PendingStep<T, E>,
    mut history: H,
) -> Result<H::Output, PipelineError<E>>
where
    T: Send + 'static,
    E: Send + 'static,
    H: History<T>,
{
    let outcome = pending.await;
    let mut acc = settle(acc, outcome, &mut history).map_err(|source| {
        composer_debug!("asynchronous step {} failed", suspended_at);
        PipelineError::async_step(suspended_at, &steps[suspended_at], source)
    })?;

    for (index, step) in steps.iter().enumerate().skip(suspended_at + 1) {
        composer_trace!("running step {} ({}) after resolution", index, step.label());
        acc = match step.invoke(&acc) {
            StepResult::Ready(outcome) => settle(acc, outcome, &mut history)
                .map_err(|source| PipelineError::step_execution(index, step, source))?,
            StepResult::Pending(pending) => {
                let outcome = pending.await;
                settle(acc, outcome, &mut history)
                    .map_err(|source| PipelineError::async_step(index, step, source))?
            }
        };
    }

    Ok(history.finish(acc))
}

/// Picks the next accumulator: the step's value, or the current one on `NoValue`.
fn settle<T, E, H: History<T>>(
    acc: T,
    outcome: Result<StepValue<T>, E>,
    history: &mut H,
) -> Result<T, E> {
    match outcome? {
        StepValue::Value(next) => {
            history.record(&next);
            Ok(next)
        }
        StepValue::NoValue => Ok(acc),
    }
}

impl<T, E> Clone for Pipeline<T, E> {
    fn clone(&self) -> Self {
        Self {
            steps: Arc::clone(&self.steps),
        }
    }
}

impl<T, E> fmt::Debug for Pipeline<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.steps.iter().map(Step::label))
            .finish()
    }
}

impl<T, E> FromIterator<Step<T, E>> for Pipeline<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    fn from_iter<I: IntoIterator<Item = Step<T, E>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
