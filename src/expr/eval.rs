//! Column expression evaluation.

use crate::error::{EvalError, EvalResult};
use crate::expr::node::{ArithOp, ColExpr};
use crate::frame::{compare_values, Column, DataFrame, Value};
use log::trace;

/// The evaluation context: a whole frame or a single column.
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    Frame(&'a DataFrame),
    Column(&'a Column),
}

/// The reified result shape of evaluating a column expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluated {
    Scalar(Value),
    Column(Column),
    Frame(DataFrame),
}

impl Evaluated {
    /// The column form of this result, broadcasting scalars to `rows`.
    pub fn into_column(self, rows: usize) -> EvalResult<Column> {
        match self {
            Evaluated::Column(col) => Ok(col),
            Evaluated::Scalar(v) => Ok(Column::new(vec![v; rows])),
            Evaluated::Frame(_) => Err(EvalError::FrameOperand {
                operator: "column result",
            }),
        }
    }
}

/// Combine two evaluated operands element-wise, broadcasting scalars.
fn combine<F>(operator: &'static str, left: Evaluated, right: Evaluated, f: F) -> EvalResult<Evaluated>
where
    F: Fn(&Value, &Value) -> EvalResult<Value>,
{
    match (left, right) {
        (Evaluated::Frame(_), _) | (_, Evaluated::Frame(_)) => {
            Err(EvalError::FrameOperand { operator })
        }
        (Evaluated::Scalar(a), Evaluated::Scalar(b)) => f(&a, &b).map(Evaluated::Scalar),
        (Evaluated::Column(a), Evaluated::Scalar(b)) => {
            a.map(|v| f(v, &b)).map(Evaluated::Column)
        }
        (Evaluated::Scalar(a), Evaluated::Column(b)) => {
            b.map(|v| f(&a, v)).map(Evaluated::Column)
        }
        (Evaluated::Column(a), Evaluated::Column(b)) => {
            a.zip_with(&b, f).map(Evaluated::Column)
        }
    }
}

fn unary<F>(operator: &'static str, operand: Evaluated, f: F) -> EvalResult<Evaluated>
where
    F: Fn(&Value) -> EvalResult<Value>,
{
    match operand {
        Evaluated::Frame(_) => Err(EvalError::FrameOperand { operator }),
        Evaluated::Scalar(v) => f(&v).map(Evaluated::Scalar),
        Evaluated::Column(col) => col.map(f).map(Evaluated::Column),
    }
}

fn require_column(operator: &'static str, operand: Evaluated) -> EvalResult<Column> {
    match operand {
        Evaluated::Column(col) => Ok(col),
        Evaluated::Scalar(v) => Ok(Column::new(vec![v])),
        Evaluated::Frame(_) => Err(EvalError::FrameOperand { operator }),
    }
}

impl ColExpr {
    /// Evaluate against a frame.
    pub fn eval(&self, df: &DataFrame) -> EvalResult<Evaluated> {
        self.eval_target(Target::Frame(df))
    }

    /// Evaluate against a single column (the context [`crate::expr::values`]
    /// requires).
    pub fn eval_column(&self, column: &Column) -> EvalResult<Evaluated> {
        self.eval_target(Target::Column(column))
    }

    /// Evaluate against a frame and interpret the result as a boolean row
    /// mask, broadcasting a scalar result to every row.
    pub fn eval_mask(&self, df: &DataFrame) -> EvalResult<Vec<bool>> {
        let column = self.eval(df)?.into_column(df.num_rows())?;
        if column.len() != df.num_rows() {
            return Err(EvalError::LengthMismatch {
                expected: df.num_rows(),
                actual: column.len(),
            });
        }
        trace!("mask expression evaluated over {} rows", column.len());
        column.as_mask()
    }

    pub fn eval_target(&self, target: Target<'_>) -> EvalResult<Evaluated> {
        match self {
            ColExpr::Col(Some(name)) => match target {
                Target::Frame(df) => df.column(name).map(|c| Evaluated::Column(c.clone())),
                Target::Column(_) => Err(EvalError::FrameContextRequired),
            },
            ColExpr::Col(None) => match target {
                Target::Frame(df) => Ok(Evaluated::Frame(df.clone())),
                Target::Column(_) => Err(EvalError::FrameContextRequired),
            },
            ColExpr::Index => match target {
                Target::Frame(df) => Ok(Evaluated::Column(df.index())),
                Target::Column(_) => Err(EvalError::FrameContextRequired),
            },
            ColExpr::Values => match target {
                Target::Column(col) => Ok(Evaluated::Column(col.clone())),
                Target::Frame(_) => Err(EvalError::ColumnContextRequired),
            },
            ColExpr::Literal(v) => Ok(Evaluated::Scalar(v.clone())),
            ColExpr::Cmp(op, lhs, rhs) => {
                let left = lhs.eval_target(target)?;
                let right = rhs.eval_target(target)?;
                combine(op.as_str(), left, right, |a, b| {
                    compare_values(*op, a, b).map(Value::Bool)
                })
            }
            ColExpr::Or(lhs, rhs) => {
                let left = lhs.eval_target(target)?;
                let right = rhs.eval_target(target)?;
                combine("|", left, right, Value::bool_or)
            }
            ColExpr::And(lhs, rhs) => {
                let left = lhs.eval_target(target)?;
                let right = rhs.eval_target(target)?;
                combine("&", left, right, Value::bool_and)
            }
            ColExpr::Not(inner) => unary("!", inner.eval_target(target)?, Value::bool_not),
            ColExpr::Arith(op, lhs, rhs) => {
                let left = lhs.eval_target(target)?;
                let right = rhs.eval_target(target)?;
                let f: fn(&Value, &Value) -> EvalResult<Value> = match op {
                    ArithOp::Add => Value::add,
                    ArithOp::Sub => Value::sub,
                    ArithOp::Mul => Value::mul,
                    ArithOp::Div => Value::div,
                    ArithOp::Pow => Value::pow,
                };
                combine(op.as_str(), left, right, f)
            }
            ColExpr::Apply(inner, f) => {
                let column = require_column("apply", inner.eval_target(target)?)?;
                (f.0)(&column).map(Evaluated::Column)
            }
            ColExpr::Map(inner, f) => unary("map", inner.eval_target(target)?, |v| (f.0)(v)),
            ColExpr::IsInValues(inner, values) => {
                unary("isin", inner.eval_target(target)?, |v| {
                    values.contains_member(v).map(Value::Bool)
                })
            }
            ColExpr::Contains(inner, value) => {
                unary("contains", inner.eval_target(target)?, |v| {
                    v.contains_member(value).map(Value::Bool)
                })
            }
            ColExpr::IsNa(inner) => unary("isna", inner.eval_target(target)?, |v| {
                Ok(Value::Bool(v.is_na()))
            }),
            ColExpr::NotNa(inner) => unary("notna", inner.eval_target(target)?, |v| {
                Ok(Value::Bool(!v.is_na()))
            }),
            ColExpr::Cast(inner, to) => {
                unary("astype", inner.eval_target(target)?, |v| v.cast(*to))
            }
            ColExpr::ToList(inner) => unary("to_list", inner.eval_target(target)?, |v| {
                Ok(Value::List(vec![v.clone()]))
            }),
        }
    }
}
