//! Accessor operators for drilling into nested values.

use crate::error::EvalError;
use crate::frame::Value;
use crate::operator::base::{operator, Operator};

/// An operator extracting the element at `index` from a list value.
/// Composes with `>>` for nested access.
pub fn index_getter(index: usize) -> Operator {
    operator(move |v| match v {
        Value::List(items) => items
            .get(index)
            .cloned()
            .ok_or(EvalError::IndexOutOfBounds {
                index,
                len: items.len(),
            }),
        other => Err(EvalError::NotAContainer {
            actual: other.data_type(),
        }),
    })
}

/// An operator extracting one character (as a string) from a string value.
pub fn char_getter(index: usize) -> Operator {
    operator(move |v| {
        let s = v.as_str().ok_or(EvalError::NotAString {
            actual: v.data_type(),
        })?;
        s.chars()
            .nth(index)
            .map(|c| Value::Str(c.to_string()))
            .ok_or_else(|| EvalError::IndexOutOfBounds {
                index,
                len: s.chars().count(),
            })
    })
}
