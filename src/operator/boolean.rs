//! Boolean operators: predicates composable with `|`, `&` and `!`.

use crate::error::{ErrorKind, EvalResult};
use crate::frame::Value;
use crate::operator::base::{kind_matches, OpFn, Operator, Outcome};
use std::fmt;
use std::ops::{BitAnd, BitOr, Not, Shr};
use std::sync::Arc;

#[derive(Clone)]
enum BoolNode {
    Function(OpFn),
    Piped(Box<Operator>, Box<BoolOp>),
    Or(Box<BoolOp>, Box<BoolOp>),
    And(Box<BoolOp>, Box<BoolOp>),
    Not(Box<BoolOp>),
    Fallback {
        inner: Box<BoolOp>,
        value: Value,
        kinds: Option<Vec<ErrorKind>>,
    },
}

/// A lazily-evaluated predicate over values.
///
/// `|`, `&` and `!` build new nodes combining results element-wise, with
/// bitwise semantics: BOTH operands of `|` and `&` are always evaluated, so
/// an unguarded failing side raises even when the other side already decided
/// the result. Attach [`BoolOp::fallback`] to degrade a risky predicate
/// instead.
#[derive(Clone)]
pub struct BoolOp {
    node: BoolNode,
}

/// Coerce a raw predicate result. Booleans pass through; a vectorized result
/// (list of booleans) is preserved; scalars collapse to their truthiness.
fn coerce_boolish(v: Value) -> Value {
    match v {
        Value::Bool(_) | Value::List(_) => v,
        other => Value::Bool(other.truthy()),
    }
}

impl BoolOp {
    /// Wrap a predicate function as a leaf.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value) -> EvalResult<Value> + Send + Sync + 'static,
    {
        Self {
            node: BoolNode::Function(Arc::new(f)),
        }
    }

    /// Evaluate against one input value. The result is `Value::Bool`, or a
    /// `Value::List` of booleans for vectorized predicates.
    pub fn eval(&self, arg: &Value) -> EvalResult<Value> {
        self.run(arg).map(Outcome::into_value)
    }

    /// Evaluate and collapse to a plain `bool` (missing/empty is false).
    pub fn matches(&self, arg: &Value) -> EvalResult<bool> {
        Ok(self.eval(arg)?.truthy())
    }

    fn run(&self, arg: &Value) -> EvalResult<Outcome> {
        match &self.node {
            BoolNode::Function(f) => f(arg).map(|v| Outcome::Clean(coerce_boolish(v))),
            BoolNode::Piped(left, right) => match left.run(arg)? {
                Outcome::Clean(v) => right.run(&v),
                fell_back @ Outcome::FellBack(_) => Ok(fell_back),
            },
            BoolNode::Or(a, b) => {
                let left = a.run(arg)?.into_value();
                let right = b.run(arg)?.into_value();
                left.bool_or(&right).map(Outcome::Clean)
            }
            BoolNode::And(a, b) => {
                let left = a.run(arg)?.into_value();
                let right = b.run(arg)?.into_value();
                left.bool_and(&right).map(Outcome::Clean)
            }
            BoolNode::Not(inner) => {
                let v = inner.run(arg)?.into_value();
                v.bool_not().map(Outcome::Clean)
            }
            BoolNode::Fallback {
                inner,
                value,
                kinds,
            } => match inner.run(arg) {
                Ok(outcome) => Ok(outcome),
                Err(err) if kind_matches(kinds, &err) => Ok(Outcome::FellBack(value.clone())),
                Err(err) => Err(err),
            },
        }
    }

    /// Prepend a transforming stage: the returned predicate evaluates `op`
    /// first, then this predicate on its output (`op >> pred` sugar).
    pub fn after(self, op: Operator) -> BoolOp {
        BoolOp {
            node: BoolNode::Piped(Box::new(op), Box::new(self)),
        }
    }

    pub fn or(self, other: BoolOp) -> BoolOp {
        BoolOp {
            node: BoolNode::Or(Box::new(self), Box::new(other)),
        }
    }

    pub fn and(self, other: BoolOp) -> BoolOp {
        BoolOp {
            node: BoolNode::And(Box::new(self), Box::new(other)),
        }
    }

    pub fn negate(self) -> BoolOp {
        BoolOp {
            node: BoolNode::Not(Box::new(self)),
        }
    }

    /// Return `value` instead of propagating any evaluation error.
    pub fn fallback(self, value: impl Into<Value>) -> BoolOp {
        BoolOp {
            node: BoolNode::Fallback {
                inner: Box::new(self),
                value: value.into(),
                kinds: None,
            },
        }
    }

    /// Return `value` instead of propagating errors of the given kinds.
    pub fn fallback_on(
        self,
        value: impl Into<Value>,
        kinds: impl IntoIterator<Item = ErrorKind>,
    ) -> BoolOp {
        BoolOp {
            node: BoolNode::Fallback {
                inner: Box::new(self),
                value: value.into(),
                kinds: Some(kinds.into_iter().collect()),
            },
        }
    }
}

impl fmt::Debug for BoolOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node {
            BoolNode::Function(_) => f.write_str("BoolOp::Function"),
            BoolNode::Piped(l, r) => f.debug_tuple("BoolOp::Piped").field(l).field(r).finish(),
            BoolNode::Or(a, b) => f.debug_tuple("BoolOp::Or").field(a).field(b).finish(),
            BoolNode::And(a, b) => f.debug_tuple("BoolOp::And").field(a).field(b).finish(),
            BoolNode::Not(x) => f.debug_tuple("BoolOp::Not").field(x).finish(),
            BoolNode::Fallback { inner, value, .. } => f
                .debug_struct("BoolOp::Fallback")
                .field("inner", inner)
                .field("value", value)
                .finish(),
        }
    }
}

impl BitOr for BoolOp {
    type Output = BoolOp;

    fn bitor(self, rhs: BoolOp) -> BoolOp {
        self.or(rhs)
    }
}

impl BitAnd for BoolOp {
    type Output = BoolOp;

    fn bitand(self, rhs: BoolOp) -> BoolOp {
        self.and(rhs)
    }
}

impl Not for BoolOp {
    type Output = BoolOp;

    fn not(self) -> BoolOp {
        self.negate()
    }
}

impl Shr<BoolOp> for Operator {
    type Output = BoolOp;

    fn shr(self, rhs: BoolOp) -> BoolOp {
        rhs.after(self)
    }
}

/// Wrap a predicate function as a [`BoolOp`].
pub fn bool_operator<F>(f: F) -> BoolOp
where
    F: Fn(&Value) -> EvalResult<Value> + Send + Sync + 'static,
{
    BoolOp::new(f)
}
