//! Sequence helpers: mapping, filtering, grouping, flattening.
//!
//! The parallel variant fans work out over a rayon worker pool; nothing is
//! shared between tasks beyond the function and the inputs.

use crate::error::EvalResult;
use crate::frame::Value;
use crate::operator::BoolOp;
use rayon::prelude::*;
use std::collections::HashMap;
use std::hash::Hash;

/// Apply `f` to every element, collecting the results.
pub fn mapped<T, U, F>(f: F, seq: impl IntoIterator<Item = T>) -> Vec<U>
where
    F: FnMut(T) -> U,
{
    seq.into_iter().map(f).collect()
}

/// Apply `f` to every element in parallel.
pub fn par_mapped<T, U, F>(f: F, seq: Vec<T>) -> Vec<U>
where
    T: Send,
    U: Send,
    F: Fn(T) -> U + Send + Sync,
{
    seq.into_par_iter().map(f).collect()
}

/// Keep the elements satisfying `pred`.
pub fn filtered<T, F>(pred: F, seq: impl IntoIterator<Item = T>) -> Vec<T>
where
    F: Fn(&T) -> bool,
{
    seq.into_iter().filter(|item| pred(item)).collect()
}

/// Keep the values for which the predicate operator evaluates truthy.
/// Evaluation errors propagate; guard the operator with a fallback to
/// degrade instead.
pub fn filtered_op(op: &BoolOp, seq: impl IntoIterator<Item = Value>) -> EvalResult<Vec<Value>> {
    let mut kept = Vec::new();
    for value in seq {
        if op.matches(&value)? {
            kept.push(value);
        }
    }
    Ok(kept)
}

/// Group elements by a key function, preserving element order per group.
pub fn groupby<T, K, F>(key: F, seq: impl IntoIterator<Item = T>) -> HashMap<K, Vec<T>>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut groups: HashMap<K, Vec<T>> = HashMap::new();
    for item in seq {
        groups.entry(key(&item)).or_default().push(item);
    }
    groups
}

/// Flatten nested lists. `depth` limits how many levels are unwrapped;
/// `None` flattens fully. Non-list values (including nulls) pass through
/// unchanged.
pub fn flatten(seq: &[Value], depth: Option<usize>) -> Vec<Value> {
    let mut out = Vec::new();
    flatten_into(seq, depth, &mut out);
    out
}

fn flatten_into(seq: &[Value], depth: Option<usize>, out: &mut Vec<Value>) {
    for value in seq {
        match value {
            Value::List(items) if depth != Some(0) => {
                flatten_into(items, depth.map(|d| d - 1), out)
            }
            other => out.push(other.clone()),
        }
    }
}

/// Map `f` over the sequence, flatten the results to `depth`, and drop
/// missing values when `drop_null` is set.
pub fn flat_map<F>(f: F, seq: &[Value], depth: Option<usize>, drop_null: bool) -> Vec<Value>
where
    F: Fn(&Value) -> Value,
{
    let mapped: Vec<Value> = seq.iter().map(f).collect();
    let flat = flatten(&mapped, depth);
    if drop_null {
        flat.into_iter().filter(|v| !v.is_na()).collect()
    } else {
        flat
    }
}
