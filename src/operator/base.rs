//! Single-argument operators and sequential piping.

use crate::error::{ErrorKind, EvalError, EvalResult};
use crate::frame::Value;
use std::fmt;
use std::ops::Shr;
use std::sync::Arc;

pub(crate) type OpFn = Arc<dyn Fn(&Value) -> EvalResult<Value> + Send + Sync>;

/// Result of one evaluation step, distinguishing a clean value from a value
/// produced by a fallback wrapper. A pipe short-circuits on the latter so the
/// fallback surfaces as the final output instead of being re-processed.
#[derive(Debug, Clone)]
pub(crate) enum Outcome {
    Clean(Value),
    FellBack(Value),
}

impl Outcome {
    pub(crate) fn into_value(self) -> Value {
        match self {
            Outcome::Clean(v) | Outcome::FellBack(v) => v,
        }
    }
}

pub(crate) fn kind_matches(kinds: &Option<Vec<ErrorKind>>, err: &EvalError) -> bool {
    match kinds {
        None => true,
        Some(kinds) => kinds.contains(&err.kind()),
    }
}

#[derive(Clone)]
enum OpNode {
    Function(OpFn),
    Piped(Box<Operator>, Box<Operator>),
    Fallback {
        inner: Box<Operator>,
        value: Value,
        kinds: Option<Vec<ErrorKind>>,
    },
}

/// A lazily-evaluated single-argument operation over values.
///
/// Operators compose left-to-right with `>>` (or [`Operator::pipe`]):
/// `(a >> b).eval(x)` is `b.eval(a.eval(x))`. Composition builds a new
/// operator and never mutates its parts; the same operator can be evaluated
/// any number of times.
#[derive(Clone)]
pub struct Operator {
    node: OpNode,
}

impl Operator {
    /// Wrap a fallible function as an operator leaf.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value) -> EvalResult<Value> + Send + Sync + 'static,
    {
        Self {
            node: OpNode::Function(Arc::new(f)),
        }
    }

    /// Evaluate against one input value.
    pub fn eval(&self, arg: &Value) -> EvalResult<Value> {
        self.run(arg).map(Outcome::into_value)
    }

    pub(crate) fn run(&self, arg: &Value) -> EvalResult<Outcome> {
        match &self.node {
            OpNode::Function(f) => f(arg).map(Outcome::Clean),
            OpNode::Piped(left, right) => match left.run(arg)? {
                Outcome::Clean(v) => right.run(&v),
                fell_back @ Outcome::FellBack(_) => Ok(fell_back),
            },
            OpNode::Fallback {
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

    /// Sequential composition: evaluate `self`, then `right` on its output.
    pub fn pipe(self, right: Operator) -> Operator {
        Operator {
            node: OpNode::Piped(Box::new(self), Box::new(right)),
        }
    }

    /// Return `value` instead of propagating any evaluation error.
    pub fn fallback(self, value: impl Into<Value>) -> Operator {
        Operator {
            node: OpNode::Fallback {
                inner: Box::new(self),
                value: value.into(),
                kinds: None,
            },
        }
    }

    /// Return `value` instead of propagating errors of the given kinds;
    /// other errors still propagate.
    pub fn fallback_on(
        self,
        value: impl Into<Value>,
        kinds: impl IntoIterator<Item = ErrorKind>,
    ) -> Operator {
        Operator {
            node: OpNode::Fallback {
                inner: Box::new(self),
                value: value.into(),
                kinds: Some(kinds.into_iter().collect()),
            },
        }
    }
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node {
            OpNode::Function(_) => f.write_str("Operator::Function"),
            OpNode::Piped(l, r) => f.debug_tuple("Operator::Piped").field(l).field(r).finish(),
            OpNode::Fallback { inner, value, .. } => f
                .debug_struct("Operator::Fallback")
                .field("inner", inner)
                .field("value", value)
                .finish(),
        }
    }
}

impl Shr for Operator {
    type Output = Operator;

    fn shr(self, rhs: Operator) -> Operator {
        self.pipe(rhs)
    }
}

/// Wrap a plain function as an [`Operator`].
pub fn operator<F>(f: F) -> Operator
where
    F: Fn(&Value) -> EvalResult<Value> + Send + Sync + 'static,
{
    Operator::new(f)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plus_one() -> Operator {
        operator(|v| v.add(&Value::Int(1)))
    }

    fn times_two() -> Operator {
        operator(|v| v.mul(&Value::Int(2)))
    }

    #[test]
    fn test_basic() {
        assert_eq!(plus_one().eval(&Value::Int(1)).unwrap(), Value::Int(2));
    }

    #[test]
    fn test_piped() {
        let c = plus_one() >> times_two();
        assert_eq!(c.eval(&Value::Int(1)).unwrap(), Value::Int(4));
        let d = times_two() >> plus_one();
        assert_eq!(d.eval(&Value::Int(1)).unwrap(), Value::Int(3));
        let e = c >> d; // ((x + 1) * 2) * 2 + 1
        assert_eq!(e.eval(&Value::Int(1)).unwrap(), Value::Int(9));
    }

    #[test]
    fn test_pipe_associativity() {
        let abc = (plus_one() >> times_two()) >> plus_one();
        let abc2 = plus_one() >> (times_two() >> plus_one());
        for x in [-3i64, 0, 7] {
            assert_eq!(
                abc.eval(&Value::Int(x)).unwrap(),
                abc2.eval(&Value::Int(x)).unwrap()
            );
        }
    }

    #[test]
    fn test_fallback() {
        let add = plus_one();
        assert!(add.eval(&Value::Str("a".into())).is_err());

        let guarded = plus_one().fallback(Value::Null);
        assert_eq!(guarded.eval(&Value::Str("a".into())).unwrap(), Value::Null);
        assert_eq!(guarded.eval(&Value::Int(1)).unwrap(), Value::Int(2));

        let named = plus_one().fallback("null");
        assert_eq!(
            named.eval(&Value::Str("a".into())).unwrap(),
            Value::Str("null".into())
        );

        // Matching kind is intercepted, others propagate
        let typed = plus_one().fallback_on(Value::Null, [ErrorKind::Type]);
        assert_eq!(typed.eval(&Value::Str("a".into())).unwrap(), Value::Null);
        let wrong = plus_one().fallback_on(Value::Null, [ErrorKind::Arithmetic]);
        assert!(wrong.eval(&Value::Str("a".into())).is_err());
    }

    #[test]
    fn test_fallback_short_circuits_pipe() {
        // A fallback in the first stage surfaces as the final output even
        // though its value would not be valid input to the second stage.
        let piped = plus_one().fallback("failed") >> times_two();
        assert_eq!(
            piped.eval(&Value::Str("a".into())).unwrap(),
            Value::Str("failed".into())
        );
        // Clean values still flow through the second stage.
        assert_eq!(piped.eval(&Value::Int(2)).unwrap(), Value::Int(6));
    }

    #[test]
    fn test_unguarded_second_stage_raises() {
        let to_str = operator(|v| v.cast(crate::frame::DataType::Str));
        let piped = to_str >> plus_one();
        assert!(piped.eval(&Value::Int(1)).is_err());
    }

    #[test]
    fn test_outer_fallback_covers_whole_pipe() {
        let piped = (plus_one() >> times_two()).fallback(Value::Int(-1));
        assert_eq!(piped.eval(&Value::Str("a".into())).unwrap(), Value::Int(-1));
        assert_eq!(piped.eval(&Value::Int(1)).unwrap(), Value::Int(4));
    }
}
