//! One-dimensional columns of values with element-wise kernels.

use crate::error::{EvalError, EvalResult};
use crate::frame::value::{DataType, Value};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Which comparison a comparison node performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmpOp {
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        }
    }
}

/// Apply a comparison between two scalar values under mask semantics:
/// missing operands never satisfy any comparison.
pub fn compare_values(op: CmpOp, left: &Value, right: &Value) -> EvalResult<bool> {
    if left.is_na() || right.is_na() {
        return Ok(false);
    }
    match op {
        CmpOp::Eq => Ok(left == right),
        _ => {
            let ord = left.try_cmp(right)?;
            Ok(match ord {
                None => false,
                Some(ord) => match op {
                    CmpOp::Lt => ord == Ordering::Less,
                    CmpOp::Le => ord != Ordering::Greater,
                    CmpOp::Gt => ord == Ordering::Greater,
                    CmpOp::Ge => ord != Ordering::Less,
                    CmpOp::Eq => unreachable!(),
                },
            })
        }
    }
}

/// A column: an ordered sequence of values, one per row.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Column {
    values: Vec<Value>,
}

impl Column {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn get(&self, row: usize) -> Option<&Value> {
        self.values.get(row)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    /// Apply a fallible function to every element.
    pub fn map<F>(&self, f: F) -> EvalResult<Column>
    where
        F: Fn(&Value) -> EvalResult<Value>,
    {
        let values = self.values.iter().map(f).collect::<EvalResult<Vec<_>>>()?;
        Ok(Column::new(values))
    }

    /// Combine two equal-length columns element-wise.
    pub fn zip_with<F>(&self, other: &Column, f: F) -> EvalResult<Column>
    where
        F: Fn(&Value, &Value) -> EvalResult<Value>,
    {
        if self.len() != other.len() {
            return Err(EvalError::LengthMismatch {
                expected: self.len(),
                actual: other.len(),
            });
        }
        let values = self
            .values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| f(a, b))
            .collect::<EvalResult<Vec<_>>>()?;
        Ok(Column::new(values))
    }

    /// Element-wise membership in a literal container.
    pub fn isin(&self, values: &Value) -> EvalResult<Column> {
        self.map(|v| values.contains_member(v).map(Value::Bool))
    }

    pub fn isna(&self) -> Column {
        Column::new(self.values.iter().map(|v| Value::Bool(v.is_na())).collect())
    }

    pub fn notna(&self) -> Column {
        Column::new(
            self.values
                .iter()
                .map(|v| Value::Bool(!v.is_na()))
                .collect(),
        )
    }

    pub fn astype(&self, to: DataType) -> EvalResult<Column> {
        self.map(|v| v.cast(to))
    }

    /// Wrap every element in a one-element list.
    pub fn to_list(&self) -> Column {
        Column::new(
            self.values
                .iter()
                .map(|v| Value::List(vec![v.clone()]))
                .collect(),
        )
    }

    /// Interpret this column as a boolean row mask. Missing values select
    /// nothing; non-boolean values are a type error.
    pub fn as_mask(&self) -> EvalResult<Vec<bool>> {
        self.values
            .iter()
            .map(|v| match v {
                Value::Bool(b) => Ok(*b),
                Value::Null => Ok(false),
                other => Err(EvalError::NotBoolean {
                    actual: other.data_type(),
                }),
            })
            .collect()
    }
}

impl<T: Into<Value>> FromIterator<T> for Column {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Column::new(iter.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Column {
    fn from(values: Vec<T>) -> Self {
        values.into_iter().collect()
    }
}

impl IntoIterator for Column {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a Column {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
