use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

/// What a finished step hands back to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepValue<T> {
    /// A new accumulator value. `0`, `""` and `false` are values like any other.
    Value(T),
    /// The step was a side effect; the accumulator passes through unchanged.
    NoValue,
}

impl<T> StepValue<T> {
    pub fn is_value(&self) -> bool {
        matches!(self, StepValue::Value(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            StepValue::Value(value) => Some(value),
            StepValue::NoValue => None,
        }
    }
}

impl<T> From<Option<T>> for StepValue<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => StepValue::Value(value),
            None => StepValue::NoValue,
        }
    }
}

/// Handle for a step result that becomes available later, exactly once.
pub type PendingStep<T, E> = BoxFuture<'static, Result<StepValue<T>, E>>;

/// Result of invoking a step: either available now or still in flight.
pub enum StepResult<T, E> {
    Ready(Result<StepValue<T>, E>),
    Pending(PendingStep<T, E>),
}

impl<T, E> StepResult<T, E> {
    pub fn value(value: T) -> Self {
        StepResult::Ready(Ok(StepValue::Value(value)))
    }

    pub fn no_value() -> Self {
        StepResult::Ready(Ok(StepValue::NoValue))
    }

    pub fn failed(error: E) -> Self {
        StepResult::Ready(Err(error))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, StepResult::Pending(_))
    }
}

impl<T: fmt::Debug, E: fmt::Debug> fmt::Debug for StepResult<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepResult::Ready(outcome) => f.debug_tuple("Ready").field(outcome).finish(),
            StepResult::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

type StepFn<T, E> = dyn Fn(&T) -> StepResult<T, E> + Send + Sync;

const DEFAULT_LABEL: &str = "step";

/// One single-argument function in a pipeline.
///
/// Whether a step is pure or a side effect, synchronous or asynchronous, is not
/// declared anywhere: the pipeline reads it off the [`StepResult`] each time the
/// step runs. The constructors below cover the common shapes; [`Step::new`]
/// accepts any function returning a `StepResult` directly.
pub struct Step<T, E> {
    label: Arc<str>,
    run: Arc<StepFn<T, E>>,
}

impl<T, E> Step<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&T) -> StepResult<T, E> + Send + Sync + 'static,
    {
        Self {
            label: Arc::from(DEFAULT_LABEL),
            run: Arc::new(f),
        }
    }

    /// Pure synchronous step.
    pub fn map<F>(f: F) -> Self
    where
        F: Fn(&T) -> T + Send + Sync + 'static,
    {
        Self::new(move |input| StepResult::value(f(input)))
    }

    /// Synchronous step that may fail.
    pub fn try_map<F>(f: F) -> Self
    where
        F: Fn(&T) -> Result<T, E> + Send + Sync + 'static,
    {
        Self::new(move |input| StepResult::Ready(f(input).map(StepValue::Value)))
    }

    /// Synchronous step where `None` means "nothing new, keep the input".
    pub fn optional<F>(f: F) -> Self
    where
        F: Fn(&T) -> Option<T> + Send + Sync + 'static,
    {
        Self::new(move |input| StepResult::Ready(Ok(f(input).into())))
    }

    /// Synchronous side effect. Never replaces the accumulator.
    pub fn effect<F>(f: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        Self::new(move |input| {
            f(input);
            StepResult::no_value()
        })
    }

    /// Asynchronous step. The returned future must own everything it needs.
    pub fn then<F, Fut>(f: F) -> Self
    where
        F: Fn(&T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self::new(move |input| {
            StepResult::Pending(f(input).map(|outcome| outcome.map(StepValue::Value)).boxed())
        })
    }

    /// Asynchronous step where `Ok(None)` means "nothing new, keep the input".
    pub fn then_optional<F, Fut>(f: F) -> Self
    where
        F: Fn(&T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<T>, E>> + Send + 'static,
    {
        Self::new(move |input| {
            StepResult::Pending(f(input).map(|outcome| outcome.map(StepValue::from)).boxed())
        })
    }
}

impl<T, E> Step<T, E> {
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Arc::from(label.into());
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn invoke(&self, input: &T) -> StepResult<T, E> {
        (self.run)(input)
    }
}

impl<T, E> Clone for Step<T, E> {
    fn clone(&self) -> Self {
        Self {
            label: Arc::clone(&self.label),
            run: Arc::clone(&self.run),
        }
    }
}

impl<T, E> fmt::Debug for Step<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step").field("label", &self.label).finish()
    }
}
