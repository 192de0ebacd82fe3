//! Row selection: combine filters into one boolean mask and apply it.

use crate::error::{EvalError, EvalResult};
use crate::expr::{col, ColExpr};
use crate::frame::{DataFrame, Row, Value};
use crate::operator::BoolOp;
use log::debug;
use std::fmt;
use std::sync::Arc;

type RowPred = Arc<dyn Fn(&Row<'_>) -> bool + Send + Sync>;
type ValuePred = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// A per-column filter, the keyword-filter half of a selection.
#[derive(Clone)]
pub enum ColFilter {
    /// Equality against a plain value.
    Value(Value),
    /// Equality against another column expression.
    Expr(ColExpr),
    /// A predicate operator mapped element-wise over the column.
    Op(BoolOp),
    /// A plain predicate mapped element-wise over the column.
    Pred(ValuePred),
}

impl ColFilter {
    pub fn pred<F>(f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        ColFilter::Pred(Arc::new(f))
    }
}

impl fmt::Debug for ColFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColFilter::Value(v) => f.debug_tuple("ColFilter::Value").field(v).finish(),
            ColFilter::Expr(e) => f.debug_tuple("ColFilter::Expr").field(e).finish(),
            ColFilter::Op(op) => f.debug_tuple("ColFilter::Op").field(op).finish(),
            ColFilter::Pred(_) => f.write_str("ColFilter::Pred"),
        }
    }
}

macro_rules! colfilter_from_value {
    ($($ty:ty),*) => {
        $(impl From<$ty> for ColFilter {
            fn from(v: $ty) -> Self {
                ColFilter::Value(v.into())
            }
        })*
    };
}

colfilter_from_value!(Value, bool, i32, i64, f64, &str, String);

impl From<ColExpr> for ColFilter {
    fn from(e: ColExpr) -> Self {
        ColFilter::Expr(e)
    }
}

impl From<BoolOp> for ColFilter {
    fn from(op: BoolOp) -> Self {
        ColFilter::Op(op)
    }
}

/// One row-selection filter. All filters supplied to [`dfilter`] /
/// [`partition`] are AND-ed together.
#[derive(Clone)]
pub enum Filter {
    /// A column expression evaluated to a boolean row vector.
    Expr(ColExpr),
    /// A callable applied once per row.
    Row(RowPred),
    /// A precomputed mask, length-checked against the frame.
    Mask(Vec<bool>),
    /// A per-column filter.
    Col(String, ColFilter),
}

impl Filter {
    /// Filter on a named column; see [`ColFilter`] for the accepted shapes.
    pub fn col(name: impl Into<String>, filter: impl Into<ColFilter>) -> Self {
        Filter::Col(name.into(), filter.into())
    }

    /// Filter with a callable applied to each row.
    pub fn row<F>(f: F) -> Self
    where
        F: Fn(&Row<'_>) -> bool + Send + Sync + 'static,
    {
        Filter::Row(Arc::new(f))
    }

    /// Filter with a precomputed boolean mask.
    pub fn mask(mask: impl Into<Vec<bool>>) -> Self {
        Filter::Mask(mask.into())
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Expr(e) => f.debug_tuple("Filter::Expr").field(e).finish(),
            Filter::Row(_) => f.write_str("Filter::Row"),
            Filter::Mask(m) => f.debug_tuple("Filter::Mask").field(m).finish(),
            Filter::Col(name, cf) => f.debug_tuple("Filter::Col").field(name).field(cf).finish(),
        }
    }
}

impl From<ColExpr> for Filter {
    fn from(e: ColExpr) -> Self {
        Filter::Expr(e)
    }
}

fn filter_mask(df: &DataFrame, filter: &Filter) -> EvalResult<Vec<bool>> {
    match filter {
        Filter::Expr(expr) => expr.eval_mask(df),
        Filter::Row(f) => Ok(df.rows().map(|row| f(&row)).collect()),
        Filter::Mask(mask) => {
            if mask.len() != df.num_rows() {
                return Err(EvalError::LengthMismatch {
                    expected: df.num_rows(),
                    actual: mask.len(),
                });
            }
            Ok(mask.clone())
        }
        Filter::Col(name, col_filter) => match col_filter {
            ColFilter::Value(v) => col(name.clone()).eq(v.clone()).eval_mask(df),
            ColFilter::Expr(e) => col(name.clone()).eq(e.clone()).eval_mask(df),
            ColFilter::Op(op) => df
                .column(name)?
                .iter()
                .map(|v| op.matches(v))
                .collect::<EvalResult<Vec<bool>>>(),
            ColFilter::Pred(f) => Ok(df.column(name)?.iter().map(|v| f(v)).collect()),
        },
    }
}

/// AND all filter masks together; the initial mask selects every row.
fn pass_filter(df: &DataFrame, filters: impl IntoIterator<Item = Filter>) -> EvalResult<Vec<bool>> {
    let mut mask = vec![true; df.num_rows()];
    let mut applied = 0usize;
    for filter in filters {
        let layer = filter_mask(df, &filter)?;
        for (m, keep) in mask.iter_mut().zip(&layer) {
            *m = *m && *keep;
        }
        applied += 1;
    }
    debug!(
        "selection mask over {} rows from {} filters keeps {}",
        df.num_rows(),
        applied,
        mask.iter().filter(|b| **b).count()
    );
    Ok(mask)
}

/// Select the rows passing every filter, as a fresh independent frame.
/// With no filters this is a full copy.
pub fn dfilter(df: &DataFrame, filters: impl IntoIterator<Item = Filter>) -> EvalResult<DataFrame> {
    let mask = pass_filter(df, filters)?;
    df.filter_rows(&mask)
}

/// Split the frame into (rows passing every filter, the rest), both fresh
/// independent frames.
pub fn partition(
    df: &DataFrame,
    filters: impl IntoIterator<Item = Filter>,
) -> EvalResult<(DataFrame, DataFrame)> {
    let mask = pass_filter(df, filters)?;
    let inverse: Vec<bool> = mask.iter().map(|b| !b).collect();
    Ok((df.filter_rows(&mask)?, df.filter_rows(&inverse)?))
}
