//! Error types for expression evaluation.

use crate::frame::DataType;
use thiserror::Error;

/// Coarse classification of evaluation errors, used by fallback wrappers to
/// decide which failures they intercept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A named column could not be resolved.
    Column,
    /// Operands had the wrong type for the operation.
    Type,
    /// Operands had the right type but an invalid value.
    Value,
    /// Numeric computation failed (overflow).
    Arithmetic,
}

/// Errors that can occur while evaluating an expression tree or applying a
/// selection to a frame.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("column not found: {name}")]
    UnknownColumn { name: String },

    #[error("duplicate column name: {name}")]
    DuplicateColumn { name: String },

    #[error("invalid operand types for {operator}: left={left:?}, right={right:?}")]
    InvalidOperandTypes {
        operator: &'static str,
        left: Option<DataType>,
        right: Option<DataType>,
    },

    #[error("cannot order {left:?} against {right:?}")]
    IncomparableValues {
        left: Option<DataType>,
        right: Option<DataType>,
    },

    #[error("membership test requires a list or string container, got {actual:?}")]
    NotAContainer { actual: Option<DataType> },

    #[error("expected a string, got {actual:?}")]
    NotAString { actual: Option<DataType> },

    #[error("expected a boolean mask value, got {actual:?}")]
    NotBoolean { actual: Option<DataType> },

    #[error("cannot cast {from:?} to {to:?}: {detail}")]
    InvalidCast {
        from: Option<DataType>,
        to: DataType,
        detail: String,
    },

    #[error("integers cannot be raised to negative integer powers; cast to float first")]
    NegativeIntegerPower,

    #[error("integer overflow in {operator}")]
    Overflow { operator: &'static str },

    #[error("length mismatch: expected {expected} rows, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("index {index} out of bounds for a container of {len} elements")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("column projection requires a frame context")]
    FrameContextRequired,

    #[error("values() can only be evaluated against a single column")]
    ColumnContextRequired,

    #[error("a whole-frame operand is not valid in {operator}")]
    FrameOperand { operator: &'static str },

    #[error("invalid regular expression: {message}")]
    InvalidRegex { message: String },

    #[error("{message}")]
    Evaluation { message: String },
}

impl EvalError {
    /// The coarse kind of this error, for fallback matching.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EvalError::UnknownColumn { .. } => ErrorKind::Column,
            EvalError::InvalidOperandTypes { .. }
            | EvalError::IncomparableValues { .. }
            | EvalError::NotAContainer { .. }
            | EvalError::NotAString { .. }
            | EvalError::NotBoolean { .. }
            | EvalError::FrameContextRequired
            | EvalError::ColumnContextRequired
            | EvalError::FrameOperand { .. } => ErrorKind::Type,
            EvalError::DuplicateColumn { .. }
            | EvalError::InvalidCast { .. }
            | EvalError::NegativeIntegerPower
            | EvalError::LengthMismatch { .. }
            | EvalError::IndexOutOfBounds { .. }
            | EvalError::InvalidRegex { .. }
            | EvalError::Evaluation { .. } => ErrorKind::Value,
            EvalError::Overflow { .. } => ErrorKind::Arithmetic,
        }
    }
}

/// Result type for evaluation.
pub type EvalResult<T> = Result<T, EvalError>;
