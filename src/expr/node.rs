//! Column expression AST and fluent builders.

use crate::error::EvalResult;
use crate::frame::{CmpOp, Column, DataType, Value};
use std::fmt;
use std::ops::{Add, BitAnd, BitOr, Div, Mul, Not, Sub};
use std::sync::Arc;

/// Arithmetic node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl ArithOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::Pow => "pow",
        }
    }
}

/// A whole-column transform stored in an expression node.
#[derive(Clone)]
pub struct ColumnFn(pub(crate) Arc<dyn Fn(&Column) -> EvalResult<Column> + Send + Sync>);

impl fmt::Debug for ColumnFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<column fn>")
    }
}

/// A per-element transform stored in an expression node.
#[derive(Clone)]
pub struct ValueFn(pub(crate) Arc<dyn Fn(&Value) -> EvalResult<Value> + Send + Sync>);

impl fmt::Debug for ValueFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<value fn>")
    }
}

/// A lazily-evaluated column expression.
///
/// Expressions are immutable trees: every combinator builds a new parent node
/// and never edits its children, so a tree can be evaluated any number of
/// times against different frames. Comparison methods (`eq`, `lt`, ...) build
/// nodes rather than comparing, which is why `ColExpr` implements no
/// `PartialEq` of its own.
#[derive(Debug, Clone)]
pub enum ColExpr {
    /// Projects a named column, or the whole frame when the name is `None`.
    Col(Option<String>),
    /// Projects the row index.
    Index,
    /// Identity projection, valid only against a single column.
    Values,
    /// A constant, ignoring the evaluation context.
    Literal(Value),
    Cmp(CmpOp, Box<ColExpr>, Box<ColExpr>),
    Or(Box<ColExpr>, Box<ColExpr>),
    And(Box<ColExpr>, Box<ColExpr>),
    Not(Box<ColExpr>),
    Arith(ArithOp, Box<ColExpr>, Box<ColExpr>),
    Apply(Box<ColExpr>, ColumnFn),
    Map(Box<ColExpr>, ValueFn),
    /// Element-wise membership in a literal container.
    IsInValues(Box<ColExpr>, Value),
    /// Element-wise containment of a literal value.
    Contains(Box<ColExpr>, Value),
    IsNa(Box<ColExpr>),
    NotNa(Box<ColExpr>),
    Cast(Box<ColExpr>, DataType),
    /// Wraps each element in a one-element list.
    ToList(Box<ColExpr>),
}

/// Project the named column.
pub fn col(name: impl Into<String>) -> ColExpr {
    ColExpr::Col(Some(name.into()))
}

/// Project the whole frame (the nameless column projection).
pub fn frame() -> ColExpr {
    ColExpr::Col(None)
}

/// Project the row index.
pub fn index() -> ColExpr {
    ColExpr::Index
}

/// Identity projection over a single column.
pub fn values() -> ColExpr {
    ColExpr::Values
}

/// A constant leaf.
pub fn lit(value: impl Into<Value>) -> ColExpr {
    ColExpr::Literal(value.into())
}

impl ColExpr {
    fn cmp(self, op: CmpOp, other: impl Into<ColExpr>) -> ColExpr {
        ColExpr::Cmp(op, Box::new(self), Box::new(other.into()))
    }

    pub fn eq(self, other: impl Into<ColExpr>) -> ColExpr {
        self.cmp(CmpOp::Eq, other)
    }

    /// Negated equality, built as NOT(eq).
    pub fn ne(self, other: impl Into<ColExpr>) -> ColExpr {
        !self.eq(other)
    }

    pub fn lt(self, other: impl Into<ColExpr>) -> ColExpr {
        self.cmp(CmpOp::Lt, other)
    }

    pub fn le(self, other: impl Into<ColExpr>) -> ColExpr {
        self.cmp(CmpOp::Le, other)
    }

    pub fn gt(self, other: impl Into<ColExpr>) -> ColExpr {
        self.cmp(CmpOp::Gt, other)
    }

    pub fn ge(self, other: impl Into<ColExpr>) -> ColExpr {
        self.cmp(CmpOp::Ge, other)
    }

    pub fn pow(self, other: impl Into<ColExpr>) -> ColExpr {
        ColExpr::Arith(ArithOp::Pow, Box::new(self), Box::new(other.into()))
    }

    /// Transform the evaluated column as a whole.
    pub fn apply<F>(self, f: F) -> ColExpr
    where
        F: Fn(&Column) -> EvalResult<Column> + Send + Sync + 'static,
    {
        ColExpr::Apply(Box::new(self), ColumnFn(Arc::new(f)))
    }

    /// Transform the evaluated column element-wise.
    pub fn map<F>(self, f: F) -> ColExpr
    where
        F: Fn(&Value) -> EvalResult<Value> + Send + Sync + 'static,
    {
        ColExpr::Map(Box::new(self), ValueFn(Arc::new(f)))
    }

    /// Membership test. A literal collection delegates to the column's
    /// membership kernel; a column expression pairs the two sides row by row
    /// (both operands must share row order) and tests the left value against
    /// the right row's list.
    pub fn isin(self, values: impl Into<ColExpr>) -> ColExpr {
        match values.into() {
            ColExpr::Literal(v) => ColExpr::IsInValues(Box::new(self), v),
            expr => {
                let combined = ColExpr::Arith(
                    ArithOp::Add,
                    Box::new(self.to_list()),
                    Box::new(expr.to_list()),
                );
                combined.map(|pair| match pair {
                    Value::List(items) if items.len() == 2 => {
                        items[1].contains_member(&items[0]).map(Value::Bool)
                    }
                    other => Err(crate::error::EvalError::NotAContainer {
                        actual: other.data_type(),
                    }),
                })
            }
        }
    }

    /// Element-wise containment: each row's value must be a container.
    pub fn contains(self, value: impl Into<Value>) -> ColExpr {
        ColExpr::Contains(Box::new(self), value.into())
    }

    pub fn isna(self) -> ColExpr {
        ColExpr::IsNa(Box::new(self))
    }

    pub fn notna(self) -> ColExpr {
        ColExpr::NotNa(Box::new(self))
    }

    pub fn astype(self, to: DataType) -> ColExpr {
        ColExpr::Cast(Box::new(self), to)
    }

    /// Wrap each element in a one-element list (used to build per-row
    /// candidate sets for [`ColExpr::isin`]).
    pub fn to_list(self) -> ColExpr {
        ColExpr::ToList(Box::new(self))
    }
}

impl From<Value> for ColExpr {
    fn from(v: Value) -> Self {
        ColExpr::Literal(v)
    }
}

impl From<bool> for ColExpr {
    fn from(v: bool) -> Self {
        ColExpr::Literal(v.into())
    }
}

impl From<i32> for ColExpr {
    fn from(v: i32) -> Self {
        ColExpr::Literal(v.into())
    }
}

impl From<i64> for ColExpr {
    fn from(v: i64) -> Self {
        ColExpr::Literal(v.into())
    }
}

impl From<f64> for ColExpr {
    fn from(v: f64) -> Self {
        ColExpr::Literal(v.into())
    }
}

impl From<&str> for ColExpr {
    fn from(v: &str) -> Self {
        ColExpr::Literal(v.into())
    }
}

impl From<String> for ColExpr {
    fn from(v: String) -> Self {
        ColExpr::Literal(v.into())
    }
}

impl<T: Into<Value>> From<Vec<T>> for ColExpr {
    fn from(v: Vec<T>) -> Self {
        ColExpr::Literal(v.into())
    }
}

impl<R: Into<ColExpr>> Add<R> for ColExpr {
    type Output = ColExpr;

    fn add(self, rhs: R) -> ColExpr {
        ColExpr::Arith(ArithOp::Add, Box::new(self), Box::new(rhs.into()))
    }
}

impl<R: Into<ColExpr>> Sub<R> for ColExpr {
    type Output = ColExpr;

    fn sub(self, rhs: R) -> ColExpr {
        ColExpr::Arith(ArithOp::Sub, Box::new(self), Box::new(rhs.into()))
    }
}

impl<R: Into<ColExpr>> Mul<R> for ColExpr {
    type Output = ColExpr;

    fn mul(self, rhs: R) -> ColExpr {
        ColExpr::Arith(ArithOp::Mul, Box::new(self), Box::new(rhs.into()))
    }
}

impl<R: Into<ColExpr>> Div<R> for ColExpr {
    type Output = ColExpr;

    fn div(self, rhs: R) -> ColExpr {
        ColExpr::Arith(ArithOp::Div, Box::new(self), Box::new(rhs.into()))
    }
}

impl<R: Into<ColExpr>> BitOr<R> for ColExpr {
    type Output = ColExpr;

    fn bitor(self, rhs: R) -> ColExpr {
        ColExpr::Or(Box::new(self), Box::new(rhs.into()))
    }
}

impl<R: Into<ColExpr>> BitAnd<R> for ColExpr {
    type Output = ColExpr;

    fn bitand(self, rhs: R) -> ColExpr {
        ColExpr::And(Box::new(self), Box::new(rhs.into()))
    }
}

impl Not for ColExpr {
    type Output = ColExpr;

    fn not(self) -> ColExpr {
        ColExpr::Not(Box::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders_shape() {
        assert!(matches!(col("a"), ColExpr::Col(Some(_))));
        assert!(matches!(frame(), ColExpr::Col(None)));
        assert!(matches!(index(), ColExpr::Index));
        assert!(matches!(values(), ColExpr::Values));
        assert!(matches!(lit(3), ColExpr::Literal(Value::Int(3))));

        assert!(matches!(col("a").eq(1), ColExpr::Cmp(CmpOp::Eq, _, _)));
        // ne is NOT(eq)
        assert!(matches!(col("a").ne(1), ColExpr::Not(_)));
        assert!(matches!(
            col("a") + col("b"),
            ColExpr::Arith(ArithOp::Add, _, _)
        ));
        assert!(matches!(col("a") | col("b"), ColExpr::Or(_, _)));
        assert!(matches!(col("a") & col("b"), ColExpr::And(_, _)));
        assert!(matches!(!col("a"), ColExpr::Not(_)));
    }

    #[test]
    fn test_literal_auto_wrapping() {
        // Plain operands combined with expressions become literal leaves
        match col("a") + 1 {
            ColExpr::Arith(ArithOp::Add, _, rhs) => {
                assert!(matches!(*rhs, ColExpr::Literal(Value::Int(1))))
            }
            other => panic!("unexpected node: {:?}", other),
        }
        match col("a").lt(2.5) {
            ColExpr::Cmp(CmpOp::Lt, _, rhs) => {
                assert!(matches!(*rhs, ColExpr::Literal(Value::Float(_))))
            }
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_isin_forms() {
        // Literal collections use the membership kernel node
        assert!(matches!(
            col("a").isin(vec![0i64, 1]),
            ColExpr::IsInValues(_, Value::List(_))
        ));
        // Column operands desugar through to_list + map
        assert!(matches!(col("a").isin(col("b")), ColExpr::Map(_, _)));
    }
}
