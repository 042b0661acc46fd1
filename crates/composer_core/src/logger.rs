use composer_logging::composer_info;

use crate::Step;

/// Builds a side-effect step that logs `message` at info level and leaves the
/// accumulator untouched.
///
/// Every call yields an independent step; the message is captured by value.
pub fn make_logger<T, E>(message: impl Into<String>) -> Step<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    let message = message.into();
    let label = format!("log: {message}");
    Step::effect(move |_: &T| composer_info!("{}", message)).with_label(label)
}
