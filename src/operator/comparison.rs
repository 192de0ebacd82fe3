//! Stateless factory of named comparison predicates.

use crate::error::{EvalError, EvalResult};
use crate::frame::{compare_values, CmpOp, Value};
use crate::operator::boolean::{bool_operator, BoolOp};
use regex::Regex;

/// Named predicate constructors. Each returns a [`BoolOp`]; attach
/// [`BoolOp::fallback`] / [`BoolOp::fallback_on`] to degrade gracefully on
/// dirty data instead of propagating evaluation errors.
pub struct Cmp;

fn compare(op: CmpOp, value: Value) -> BoolOp {
    bool_operator(move |x| compare_values(op, x, &value).map(Value::Bool))
}

/// A scalar or string counts as a one-element set; a list is used as-is.
fn as_value_set(values: Value) -> Vec<Value> {
    match values {
        Value::List(items) => items,
        other => vec![other],
    }
}

impl Cmp {
    pub fn eq(value: impl Into<Value>) -> BoolOp {
        let value = value.into();
        bool_operator(move |x| Ok(Value::Bool(*x == value)))
    }

    pub fn ne(value: impl Into<Value>) -> BoolOp {
        let value = value.into();
        bool_operator(move |x| Ok(Value::Bool(*x != value)))
    }

    pub fn lt(value: impl Into<Value>) -> BoolOp {
        compare(CmpOp::Lt, value.into())
    }

    pub fn le(value: impl Into<Value>) -> BoolOp {
        compare(CmpOp::Le, value.into())
    }

    pub fn gt(value: impl Into<Value>) -> BoolOp {
        compare(CmpOp::Gt, value.into())
    }

    pub fn ge(value: impl Into<Value>) -> BoolOp {
        compare(CmpOp::Ge, value.into())
    }

    /// Membership of the input in `values`. A string `values` tests
    /// substring membership; a non-container `values` is an evaluation-time
    /// type error.
    pub fn isin(values: impl Into<Value>) -> BoolOp {
        let values = values.into();
        bool_operator(move |x| values.contains_member(x).map(Value::Bool))
    }

    /// Reverse containment: the input must itself be a container holding
    /// `value`.
    pub fn contains(value: impl Into<Value>) -> BoolOp {
        let value = value.into();
        bool_operator(move |x| x.contains_member(&value).map(Value::Bool))
    }

    /// True iff every member of `values` is contained in the input.
    pub fn contains_all(values: impl Into<Value>) -> BoolOp {
        let values = as_value_set(values.into());
        bool_operator(move |x| {
            for v in &values {
                if !x.contains_member(v)? {
                    return Ok(Value::Bool(false));
                }
            }
            Ok(Value::Bool(true))
        })
    }

    /// True iff at least one member of `values` is contained in the input.
    pub fn contains_any(values: impl Into<Value>) -> BoolOp {
        let values = as_value_set(values.into());
        bool_operator(move |x| {
            for v in &values {
                if x.contains_member(v)? {
                    return Ok(Value::Bool(true));
                }
            }
            Ok(Value::Bool(false))
        })
    }

    pub fn startswith(value: impl Into<String>) -> BoolOp {
        let prefix = value.into();
        bool_operator(move |x| {
            let s = require_str(x)?;
            Ok(Value::Bool(s.starts_with(prefix.as_str())))
        })
    }

    pub fn endswith(value: impl Into<String>) -> BoolOp {
        let suffix = value.into();
        bool_operator(move |x| {
            let s = require_str(x)?;
            Ok(Value::Bool(s.ends_with(suffix.as_str())))
        })
    }

    pub fn startswith_one_of<I, S>(values: I) -> BoolOp
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let prefixes: Vec<String> = values.into_iter().map(Into::into).collect();
        bool_operator(move |x| {
            let s = require_str(x)?;
            Ok(Value::Bool(prefixes.iter().any(|p| s.starts_with(p))))
        })
    }

    pub fn endswith_one_of<I, S>(values: I) -> BoolOp
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let suffixes: Vec<String> = values.into_iter().map(Into::into).collect();
        bool_operator(move |x| {
            let s = require_str(x)?;
            Ok(Value::Bool(suffixes.iter().any(|p| s.ends_with(p))))
        })
    }

    /// True iff the pattern matches at the start of the string-coerced
    /// input.
    pub fn matches_regex(pattern: &str) -> BoolOp {
        // Anchored at the start; non-string inputs are rendered to text.
        let compiled = Regex::new(&format!(r"\A(?:{})", pattern)).map_err(|e| {
            EvalError::InvalidRegex {
                message: e.to_string(),
            }
        });
        bool_operator(move |x| {
            let re = compiled.as_ref().map_err(Clone::clone)?;
            let matched = match x.as_str() {
                Some(s) => re.is_match(s),
                None => re.is_match(&x.to_string()),
            };
            Ok(Value::Bool(matched))
        })
    }

    /// True for `Null` and float NaN, false for everything else (including
    /// infinities and zero).
    pub fn isna() -> BoolOp {
        bool_operator(|x| Ok(Value::Bool(x.is_na())))
    }

    /// Exact complement of [`Cmp::isna`].
    pub fn notna() -> BoolOp {
        !Cmp::isna()
    }
}

fn require_str(x: &Value) -> EvalResult<&str> {
    x.as_str().ok_or(EvalError::NotAString {
        actual: x.data_type(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_individual_comparisons() {
        assert_eq!(Cmp::eq(0).eval(&Value::Int(1)).unwrap(), Value::Bool(false));
        assert_eq!(Cmp::ne(0).eval(&Value::Int(1)).unwrap(), Value::Bool(true));
        assert_eq!(
            Cmp::eq(0).eval(&Value::Float(0.0)).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            Cmp::ne(0).eval(&Value::Float(0.0)).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(Cmp::lt(0).eval(&Value::Int(-1)).unwrap(), Value::Bool(true));
        assert_eq!(Cmp::lt(0).eval(&Value::Int(0)).unwrap(), Value::Bool(false));
        assert_eq!(Cmp::le(0).eval(&Value::Int(0)).unwrap(), Value::Bool(true));
        assert_eq!(Cmp::gt(0).eval(&Value::Int(1)).unwrap(), Value::Bool(true));
        assert_eq!(Cmp::gt(0).eval(&Value::Int(0)).unwrap(), Value::Bool(false));
        assert_eq!(Cmp::ge(0).eval(&Value::Int(0)).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_isin_and_contains() {
        assert_eq!(
            Cmp::isin(vec![0i64, 1]).eval(&Value::Int(0)).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            Cmp::isin(vec![0i64, 1]).eval(&Value::Int(2)).unwrap(),
            Value::Bool(false)
        );
        // Non-container values error
        let err = Cmp::isin(2).eval(&Value::Int(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);

        assert_eq!(
            Cmp::contains(0).eval(&Value::from(vec![0i64, 1])).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            Cmp::contains(2).eval(&Value::from(vec![0i64, 1])).unwrap(),
            Value::Bool(false)
        );
        let err = Cmp::contains(2).eval(&Value::Int(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
    }

    #[test]
    fn test_contains_all_any() {
        let list = Value::from(vec![0i64, 1, 2]);
        assert_eq!(Cmp::contains_any(0).eval(&list).unwrap(), Value::Bool(true));
        assert_eq!(
            Cmp::contains_any(3).eval(&list).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            Cmp::contains_any(vec![0i64, 1]).eval(&list).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            Cmp::contains_any(vec![0i64, 3]).eval(&list).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            Cmp::contains_any(vec![3i64, 4]).eval(&list).unwrap(),
            Value::Bool(false)
        );

        assert_eq!(Cmp::contains_all(0).eval(&list).unwrap(), Value::Bool(true));
        assert_eq!(
            Cmp::contains_all(3).eval(&list).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            Cmp::contains_all(vec![0i64, 1]).eval(&list).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            Cmp::contains_all(vec![0i64, 3]).eval(&list).unwrap(),
            Value::Bool(false)
        );

        // A string `values` is one member, not a set of characters
        let hello = Value::Str("hello world".into());
        assert_eq!(
            Cmp::contains_any("hello universe").eval(&hello).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            Cmp::contains_all("helo").eval(&hello).unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    fn test_string_predicates() {
        let hello = Value::Str("hello".into());
        assert_eq!(
            Cmp::startswith("he").eval(&hello).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            Cmp::startswith("lo").eval(&hello).unwrap(),
            Value::Bool(false)
        );
        assert!(Cmp::startswith("lo").eval(&Value::Int(1)).is_err());
        assert_eq!(
            Cmp::endswith("he").eval(&hello).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(Cmp::endswith("lo").eval(&hello).unwrap(), Value::Bool(true));
        assert!(Cmp::endswith("lo").eval(&Value::Int(1)).is_err());

        assert_eq!(
            Cmp::startswith_one_of(["ab", "he"]).eval(&hello).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            Cmp::endswith_one_of(["ab", "cd"]).eval(&hello).unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    fn test_matches_regex() {
        let op = Cmp::matches_regex(r"[a-z]+\d");
        assert_eq!(
            op.eval(&Value::Str("abc1".into())).unwrap(),
            Value::Bool(true)
        );
        // Anchored at the start
        assert_eq!(
            op.eval(&Value::Str("1abc1".into())).unwrap(),
            Value::Bool(false)
        );
        // Non-string input is rendered to text first
        assert_eq!(
            Cmp::matches_regex(r"\d+").eval(&Value::Int(31)).unwrap(),
            Value::Bool(true)
        );
        assert!(Cmp::matches_regex("(").eval(&Value::Str("x".into())).is_err());
    }

    #[test]
    fn test_isna_notna() {
        assert_eq!(
            Cmp::isna().eval(&Value::Float(f64::NAN)).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(Cmp::isna().eval(&Value::Null).unwrap(), Value::Bool(true));
        assert_eq!(
            Cmp::isna().eval(&Value::Float(f64::INFINITY)).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(Cmp::isna().eval(&Value::Int(0)).unwrap(), Value::Bool(false));
        assert_eq!(
            Cmp::notna().eval(&Value::Float(f64::NAN)).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(Cmp::notna().eval(&Value::Null).unwrap(), Value::Bool(false));
        assert_eq!(
            Cmp::notna().eval(&Value::Float(f64::INFINITY)).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(Cmp::notna().eval(&Value::Int(0)).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_comparison_combos() {
        let world = Value::Str("world".into());
        let combo = Cmp::gt("hello") & Cmp::contains("wo") & Cmp::isin("sweet world");
        assert_eq!(combo.eval(&world).unwrap(), Value::Bool(true));

        let hw = Value::Str("hello world".into());
        let either = Cmp::startswith("hello") | Cmp::endswith("world");
        assert_eq!(either.eval(&hw).unwrap(), Value::Bool(true));

        let nan = Value::Float(f64::NAN);
        assert_eq!(
            (Cmp::isna() | Cmp::notna()).eval(&nan).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            (Cmp::isna() | Cmp::notna()).eval(&Value::Int(1)).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            (Cmp::isna() & Cmp::notna()).eval(&nan).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            (Cmp::isna() & Cmp::notna()).eval(&Value::Int(1)).unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    fn test_exception_fallback() {
        // Ordering a string against a number is a type error by default
        assert!(Cmp::lt(0).eval(&Value::Str("a".into())).is_err());
        assert_eq!(
            Cmp::lt(0)
                .fallback(false)
                .eval(&Value::Str("a".into()))
                .unwrap(),
            Value::Bool(false)
        );
        // OR with an unguarded failing side still raises
        let half_guarded = Cmp::lt(0).fallback(false) | Cmp::gt(0);
        assert!(half_guarded.eval(&Value::Str("a".into())).is_err());
        // Two guarded predicates resolve to the surviving value
        let guarded = Cmp::lt(0).fallback(false) | Cmp::gt(0).fallback(true);
        assert_eq!(
            guarded.eval(&Value::Str("a".into())).unwrap(),
            Value::Bool(true)
        );
    }
}
