//! Dynamically-typed scalar values and their element-wise kernels.

use crate::error::{EvalError, EvalResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Data types a [`Value`] can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Bool,
    Int,
    Float,
    Str,
    List,
}

/// A single cell value.
///
/// `Null` and float NaN both count as missing (`is_na`); everything else,
/// including infinities and zero, does not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
}

impl Value {
    /// The data type of this value, `None` for `Null`.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Null => None,
            Value::Bool(_) => Some(DataType::Bool),
            Value::Int(_) => Some(DataType::Int),
            Value::Float(_) => Some(DataType::Float),
            Value::Str(_) => Some(DataType::Str),
            Value::List(_) => Some(DataType::List),
        }
    }

    /// True for `Null` and float NaN.
    pub fn is_na(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// Truthiness, matching the conventions of dynamic data tools: missing
    /// values and empty strings/lists are false, nonzero numbers are true.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn num(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Ordering comparison. NaN orders as incomparable-but-silent: any
    /// ordering test against NaN is false. Null or cross-type operands error.
    pub fn try_cmp(&self, other: &Value) -> EvalResult<Option<Ordering>> {
        if matches!(self, Value::Float(f) if f.is_nan())
            || matches!(other, Value::Float(f) if f.is_nan())
        {
            return Ok(None);
        }
        let ord = match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            _ => match (self.num(), other.num()) {
                (Some(a), Some(b)) => a.partial_cmp(&b),
                _ => {
                    return Err(EvalError::IncomparableValues {
                        left: self.data_type(),
                        right: other.data_type(),
                    })
                }
            },
        };
        Ok(ord)
    }

    /// Membership of `item` in this container. Lists test element equality;
    /// strings test substring membership of a string item. Anything else is
    /// not a container.
    pub fn contains_member(&self, item: &Value) -> EvalResult<bool> {
        match self {
            Value::List(items) => Ok(items.iter().any(|v| v == item)),
            Value::Str(s) => match item {
                Value::Str(needle) => Ok(s.contains(needle.as_str())),
                _ => Err(EvalError::InvalidOperandTypes {
                    operator: "in",
                    left: item.data_type(),
                    right: Some(DataType::Str),
                }),
            },
            _ => Err(EvalError::NotAContainer {
                actual: self.data_type(),
            }),
        }
    }

    fn invalid_operands(&self, other: &Value, operator: &'static str) -> EvalError {
        EvalError::InvalidOperandTypes {
            operator,
            left: self.data_type(),
            right: other.data_type(),
        }
    }

    /// Element-wise addition: int-preserving for int pairs, float for mixed
    /// numerics, concatenation for strings and lists. Missing propagates.
    pub fn add(&self, other: &Value) -> EvalResult<Value> {
        if self.is_na() || other.is_na() {
            return Ok(Value::Null);
        }
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_add(*b))),
            (Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{}{}", a, b))),
            (Value::List(a), Value::List(b)) => {
                let mut items = a.clone();
                items.extend(b.iter().cloned());
                Ok(Value::List(items))
            }
            _ => match (self.num(), other.num()) {
                (Some(a), Some(b)) => Ok(Value::Float(a + b)),
                _ => Err(self.invalid_operands(other, "+")),
            },
        }
    }

    pub fn sub(&self, other: &Value) -> EvalResult<Value> {
        if self.is_na() || other.is_na() {
            return Ok(Value::Null);
        }
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_sub(*b))),
            _ => match (self.num(), other.num()) {
                (Some(a), Some(b)) => Ok(Value::Float(a - b)),
                _ => Err(self.invalid_operands(other, "-")),
            },
        }
    }

    pub fn mul(&self, other: &Value) -> EvalResult<Value> {
        if self.is_na() || other.is_na() {
            return Ok(Value::Null);
        }
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_mul(*b))),
            _ => match (self.num(), other.num()) {
                (Some(a), Some(b)) => Ok(Value::Float(a * b)),
                _ => Err(self.invalid_operands(other, "*")),
            },
        }
    }

    /// True division: always floats, IEEE semantics for zero divisors.
    pub fn div(&self, other: &Value) -> EvalResult<Value> {
        if self.is_na() || other.is_na() {
            return Ok(Value::Null);
        }
        match (self.num(), other.num()) {
            (Some(a), Some(b)) => Ok(Value::Float(a / b)),
            _ => Err(self.invalid_operands(other, "/")),
        }
    }

    /// Exponentiation. Int bases with negative int exponents error; an
    /// explicit cast to float makes them succeed.
    pub fn pow(&self, other: &Value) -> EvalResult<Value> {
        if self.is_na() || other.is_na() {
            return Ok(Value::Null);
        }
        match (self, other) {
            (Value::Int(b), Value::Int(e)) => {
                if *e < 0 {
                    return Err(EvalError::NegativeIntegerPower);
                }
                let exp = u32::try_from(*e).map_err(|_| EvalError::Overflow { operator: "pow" })?;
                b.checked_pow(exp)
                    .map(Value::Int)
                    .ok_or(EvalError::Overflow { operator: "pow" })
            }
            _ => match (self.num(), other.num()) {
                (Some(b), Some(e)) => Ok(Value::Float(b.powf(e))),
                _ => Err(self.invalid_operands(other, "pow")),
            },
        }
    }

    pub(crate) fn bool_and(&self, other: &Value) -> EvalResult<Value> {
        self.bool_combine(other, "&", |a, b| a && b)
    }

    pub(crate) fn bool_or(&self, other: &Value) -> EvalResult<Value> {
        self.bool_combine(other, "|", |a, b| a || b)
    }

    fn bool_combine(
        &self,
        other: &Value,
        operator: &'static str,
        f: fn(bool, bool) -> bool,
    ) -> EvalResult<Value> {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(f(*a, *b))),
            (Value::List(a), Value::List(b)) => {
                if a.len() != b.len() {
                    return Err(EvalError::LengthMismatch {
                        expected: a.len(),
                        actual: b.len(),
                    });
                }
                let items = a
                    .iter()
                    .zip(b.iter())
                    .map(|(x, y)| x.bool_combine(y, operator, f))
                    .collect::<EvalResult<Vec<_>>>()?;
                Ok(Value::List(items))
            }
            _ => Err(self.invalid_operands(other, operator)),
        }
    }

    pub(crate) fn bool_not(&self) -> EvalResult<Value> {
        match self {
            Value::Bool(b) => Ok(Value::Bool(!b)),
            Value::List(items) => {
                let items = items
                    .iter()
                    .map(Value::bool_not)
                    .collect::<EvalResult<Vec<_>>>()?;
                Ok(Value::List(items))
            }
            _ => Err(EvalError::NotBoolean {
                actual: self.data_type(),
            }),
        }
    }

    /// Cast to another data type. Missing values stay missing; failed parses
    /// and NaN-to-int are invalid casts.
    pub fn cast(&self, to: DataType) -> EvalResult<Value> {
        if matches!(self, Value::Null) {
            return Ok(Value::Null);
        }
        let fail = |detail: String| EvalError::InvalidCast {
            from: self.data_type(),
            to,
            detail,
        };
        match to {
            DataType::Float => match self {
                Value::Int(i) => Ok(Value::Float(*i as f64)),
                Value::Float(f) => Ok(Value::Float(*f)),
                Value::Bool(b) => Ok(Value::Float(if *b { 1.0 } else { 0.0 })),
                Value::Str(s) => s
                    .trim()
                    .parse::<f64>()
                    .map(Value::Float)
                    .map_err(|e| fail(e.to_string())),
                _ => Err(fail(format!("{}", self))),
            },
            DataType::Int => match self {
                Value::Int(i) => Ok(Value::Int(*i)),
                Value::Float(f) if f.is_finite() => Ok(Value::Int(*f as i64)),
                Value::Float(_) => Err(fail("non-finite float".to_string())),
                Value::Bool(b) => Ok(Value::Int(if *b { 1 } else { 0 })),
                Value::Str(s) => s
                    .trim()
                    .parse::<i64>()
                    .map(Value::Int)
                    .map_err(|e| fail(e.to_string())),
                _ => Err(fail(format!("{}", self))),
            },
            DataType::Str => Ok(Value::Str(format!("{}", self))),
            DataType::Bool => match self {
                Value::Bool(b) => Ok(Value::Bool(*b)),
                Value::Int(_) | Value::Float(_) | Value::Str(_) => Ok(Value::Bool(self.truthy())),
                _ => Err(fail(format!("{}", self))),
            },
            DataType::List => Err(fail("cannot cast to list".to_string())),
        }
    }
}

impl PartialEq for Value {
    /// Loose equality: ints and floats compare numerically (`0 == 0.0`), NaN
    /// equals NaN. Comparison masks apply missing-value rules on top of this.
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => *a as f64 == *b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::Str(s) => write!(f, "{}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loose_equality() {
        assert_eq!(Value::Int(0), Value::Float(0.0));
        assert_ne!(Value::Int(0), Value::Int(1));
        assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
        assert_ne!(Value::Str("1".into()), Value::Int(1));
        assert_eq!(Value::Null, Value::Null);
    }

    #[test]
    fn test_is_na() {
        assert!(Value::Null.is_na());
        assert!(Value::Float(f64::NAN).is_na());
        assert!(!Value::Float(f64::INFINITY).is_na());
        assert!(!Value::Int(0).is_na());
        assert!(!Value::Str(String::new()).is_na());
    }

    #[test]
    fn test_ordering() {
        assert_eq!(
            Value::Int(1).try_cmp(&Value::Float(2.0)).unwrap(),
            Some(Ordering::Less)
        );
        assert_eq!(
            Value::Str("abc".into()).try_cmp(&Value::Str("def".into())).unwrap(),
            Some(Ordering::Less)
        );
        // NaN orders as nothing, silently
        assert_eq!(Value::Float(f64::NAN).try_cmp(&Value::Int(0)).unwrap(), None);
        // Null and cross-type ordering errors
        assert!(Value::Null.try_cmp(&Value::Int(0)).is_err());
        assert!(Value::Str("a".into()).try_cmp(&Value::Int(0)).is_err());
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(
            Value::Int(10).add(&Value::Int(5)).unwrap(),
            Value::Int(15)
        );
        assert_eq!(
            Value::Int(3).mul(&Value::Float(0.5)).unwrap(),
            Value::Float(1.5)
        );
        // Division is always float
        assert_eq!(Value::Int(3).div(&Value::Int(2)).unwrap(), Value::Float(1.5));
        // Missing propagates
        assert_eq!(Value::Null.add(&Value::Int(1)).unwrap(), Value::Null);
        assert_eq!(
            Value::Float(f64::NAN).mul(&Value::Int(2)).unwrap(),
            Value::Null
        );
        // String and list concatenation
        assert_eq!(
            Value::Str("ab".into()).add(&Value::Str("cd".into())).unwrap(),
            Value::Str("abcd".into())
        );
        assert_eq!(
            Value::from(vec![1i64]).add(&Value::from(vec![2i64, 3])).unwrap(),
            Value::from(vec![1i64, 2, 3])
        );
        // Type mismatch
        assert!(Value::Int(1).add(&Value::Str("x".into())).is_err());
    }

    #[test]
    fn test_pow() {
        assert_eq!(Value::Int(2).pow(&Value::Int(10)).unwrap(), Value::Int(1024));
        assert!(matches!(
            Value::Int(2).pow(&Value::Int(-2)),
            Err(EvalError::NegativeIntegerPower)
        ));
        assert_eq!(
            Value::Float(2.0).pow(&Value::Int(-2)).unwrap(),
            Value::Float(0.25)
        );
        assert!(matches!(
            Value::Int(2).pow(&Value::Int(80)),
            Err(EvalError::Overflow { .. })
        ));
    }

    #[test]
    fn test_contains_member() {
        let list = Value::from(vec![0i64, 1]);
        assert!(list.contains_member(&Value::Int(0)).unwrap());
        assert!(!list.contains_member(&Value::Int(2)).unwrap());
        // String containers test substrings
        let s = Value::Str("sweet world".into());
        assert!(s.contains_member(&Value::Str("world".into())).unwrap());
        assert!(!s.contains_member(&Value::Str("word".into())).unwrap());
        // Non-containers error
        assert!(matches!(
            Value::Int(2).contains_member(&Value::Int(1)),
            Err(EvalError::NotAContainer { .. })
        ));
        // Non-string member of a string container errors
        assert!(s.contains_member(&Value::Int(1)).is_err());
    }

    #[test]
    fn test_cast() {
        assert_eq!(
            Value::Int(3).cast(DataType::Float).unwrap(),
            Value::Float(3.0)
        );
        assert_eq!(
            Value::Str(" 4.5 ".into()).cast(DataType::Float).unwrap(),
            Value::Float(4.5)
        );
        assert_eq!(Value::Float(2.9).cast(DataType::Int).unwrap(), Value::Int(2));
        assert_eq!(
            Value::Int(7).cast(DataType::Str).unwrap(),
            Value::Str("7".into())
        );
        assert_eq!(Value::Null.cast(DataType::Int).unwrap(), Value::Null);
        assert!(Value::Float(f64::NAN).cast(DataType::Int).is_err());
        assert!(Value::Str("abc".into()).cast(DataType::Int).is_err());
    }

    #[test]
    fn test_bool_algebra() {
        assert_eq!(
            Value::Bool(true).bool_and(&Value::Bool(false)).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            Value::Bool(false).bool_or(&Value::Bool(true)).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(Value::Bool(true).bool_not().unwrap(), Value::Bool(false));
        let a = Value::from(vec![true, false]);
        let b = Value::from(vec![false, false]);
        assert_eq!(a.bool_or(&b).unwrap(), Value::from(vec![true, false]));
        assert!(Value::Int(1).bool_and(&Value::Bool(true)).is_err());
    }
}
