//! The arithmetic demo program: `((x * 10) + 5) * 100`.

use composer_core::{compose, make_logger, Pipeline, Step};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArithmeticError {
    #[error("{operation} overflowed for input {value}")]
    Overflow { operation: &'static str, value: i64 },
}

pub type ArithmeticStep = Step<i64, ArithmeticError>;

fn checked(operation: &'static str, apply: fn(i64) -> Option<i64>) -> ArithmeticStep {
    ArithmeticStep::try_map(move |value: &i64| {
        apply(*value).ok_or(ArithmeticError::Overflow {
            operation,
            value: *value,
        })
    })
    .with_label(operation)
}

pub fn multiply_by_ten() -> ArithmeticStep {
    checked("multiply_by_ten", |value| value.checked_mul(10))
}

pub fn add_five() -> ArithmeticStep {
    checked("add_five", |value| value.checked_add(5))
}

pub fn multiply_by_one_hundred() -> ArithmeticStep {
    checked("multiply_by_one_hundred", |value| value.checked_mul(100))
}

/// The arithmetic program, optionally announcing each step through the log.
pub fn arithmetic_pipeline(logged: bool) -> Pipeline<i64, ArithmeticError> {
    if !logged {
        return compose(vec![multiply_by_ten(), add_five(), multiply_by_one_hundred()]);
    }
    compose(vec![
        make_logger("about to multiply by 10"),
        multiply_by_ten(),
        make_logger("about to add 5"),
        add_five(),
        make_logger("about to multiply by 100"),
        multiply_by_one_hundred(),
        make_logger("finished"),
    ])
}
