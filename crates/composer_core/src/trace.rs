/// Every value an invocation produced, starting with its input.
///
/// Steps that yield no value leave no entry, so the last entry is always the
/// final result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace<T> {
    values: Vec<T>,
}

impl<T> Trace<T> {
    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn last(&self) -> Option<&T> {
        self.values.last()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<T> {
        self.values
    }
}

/// What an invocation remembers about the values flowing through it.
pub(crate) trait History<T>: Send + 'static {
    type Output: Send + 'static;

    fn record(&mut self, value: &T);

    fn finish(self, last: T) -> Self::Output;
}

/// Remembers nothing; the output is the final accumulator.
pub(crate) struct Untracked;

impl<T: Send + 'static> History<T> for Untracked {
    type Output = T;

    fn record(&mut self, _value: &T) {}

    fn finish(self, last: T) -> T {
        last
    }
}

pub(crate) struct Recorder<T> {
    values: Vec<T>,
}

impl<T> Recorder<T> {
    pub(crate) fn new() -> Self {
        Self { values: Vec::new() }
    }
}

impl<T: Clone + Send + 'static> History<T> for Recorder<T> {
    type Output = Trace<T>;

    fn record(&mut self, value: &T) {
        self.values.push(value.clone());
    }

    // `last` is already the final recorded entry.
    fn finish(self, _last: T) -> Trace<T> {
        Trace {
            values: self.values,
        }
    }
}
