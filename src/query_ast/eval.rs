//! Literal evaluation for constant folding.
//!
//! Returns `None` whenever the result would depend on engine-specific semantics
//! (NULL handling, integer division, overflow) so the caller keeps the
//! original expression.

use std::cmp::Ordering;

use super::ast::{BinaryOperator, Scalar};

pub fn evaluate_binary(op: &str, left: &Scalar, right: &Scalar) -> Option<Scalar> {
    let op = BinaryOperator::parse(op)?;
    use BinaryOperator::*;
    use Scalar::*;
    match (op, left, right) {
        (_, Null, _) | (_, _, Null) => None,

        (And, Bool(a), Bool(b)) => Some(Bool(*a && *b)),
        (Or, Bool(a), Bool(b)) => Some(Bool(*a || *b)),
        (And | Or, _, _) => None,

        (Plus, Int(a), Int(b)) => a.checked_add(*b).map(Int),
        (Minus, Int(a), Int(b)) => a.checked_sub(*b).map(Int),
        (Multiply, Int(a), Int(b)) => a.checked_mul(*b).map(Int),
        (Divide, Int(a), Int(b)) if *b != 0 && a.checked_rem(*b) == Some(0) => a.checked_div(*b).map(Int),
        (Divide, Int(_), Int(_)) => None,

        (Plus, Str(a), Str(b)) => Some(Str(format!("{}{}", a, b))),

        (Plus | Minus | Multiply | Divide, l, r) => {
            let (a, b) = (as_float(l)?, as_float(r)?);
            let out = match op {
                Plus => a + b,
                Minus => a - b,
                Multiply => a * b,
                _ if b == 0.0 => return None,
                _ => a / b,
            };
            out.is_finite().then_some(Float(out))
        }

        (Eq | NotEq | Lt | Gt | LtEq | GtEq, l, r) => {
            let ord = compare(l, r)?;
            let result = match op {
                Eq => ord == Ordering::Equal,
                NotEq => ord != Ordering::Equal,
                // Booleans only support equality.
                _ if matches!(l, Bool(_)) => return None,
                Lt => ord == Ordering::Less,
                Gt => ord == Ordering::Greater,
                LtEq => ord != Ordering::Greater,
                _ => ord != Ordering::Less,
            };
            Some(Bool(result))
        }
    }
}

fn as_float(v: &Scalar) -> Option<f64> {
    match v {
        Scalar::Int(i) => Some(*i as f64),
        Scalar::Float(f) => Some(*f),
        _ => None,
    }
}

fn compare(l: &Scalar, r: &Scalar) -> Option<Ordering> {
    match (l, r) {
        (Scalar::Int(a), Scalar::Int(b)) => Some(a.cmp(b)),
        (Scalar::Str(a), Scalar::Str(b)) => Some(a.cmp(b)),
        (Scalar::Bool(a), Scalar::Bool(b)) => Some(a.cmp(b)),
        _ => as_float(l)?.partial_cmp(&as_float(r)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(op: &str, l: impl Into<Scalar>, r: impl Into<Scalar>) -> Option<Scalar> {
        evaluate_binary(op, &l.into(), &r.into())
    }

    #[test]
    fn integer_arithmetic() {
        assert_eq!(eval("+", 1, 1), Some(Scalar::Int(2)));
        assert_eq!(eval("-", 3, 5), Some(Scalar::Int(-2)));
        assert_eq!(eval("*", 4, 5), Some(Scalar::Int(20)));
        assert_eq!(eval("/", 10, 2), Some(Scalar::Int(5)));
    }

    #[test]
    fn inexact_or_zero_integer_division_is_left_alone() {
        assert_eq!(eval("/", 1, 2), None);
        assert_eq!(eval("/", 1, 0), None);
        assert_eq!(eval("/", i64::MIN, -1), None);
    }

    #[test]
    fn overflow_is_left_alone() {
        assert_eq!(eval("+", i64::MAX, 1), None);
        assert_eq!(eval("*", 1e308, 10.0), None);
    }

    #[test]
    fn float_and_mixed_arithmetic() {
        assert_eq!(eval("+", 1, 0.5), Some(Scalar::Float(1.5)));
        assert_eq!(eval("/", 1.0, 4), Some(Scalar::Float(0.25)));
        assert_eq!(eval("/", 1.0, 0), None);
    }

    #[test]
    fn comparisons_including_aliases() {
        assert_eq!(eval("eq", 1, 1), Some(Scalar::Bool(true)));
        assert_eq!(eval("=", 1, 1.0), Some(Scalar::Bool(true)));
        assert_eq!(eval("NEQ", "a", "b"), Some(Scalar::Bool(true)));
        assert_eq!(eval("lt", "apple", "banana"), Some(Scalar::Bool(true)));
        assert_eq!(eval(">=", 2, 3), Some(Scalar::Bool(false)));
        assert_eq!(eval("<=", 3, 3), Some(Scalar::Bool(true)));
    }

    #[test]
    fn bool_helpers() {
        assert_eq!(eval("and", true, false), Some(Scalar::Bool(false)));
        assert_eq!(eval("OR", true, false), Some(Scalar::Bool(true)));
        assert_eq!(eval("=", true, true), Some(Scalar::Bool(true)));
        assert_eq!(eval("<", false, true), None);
        assert_eq!(eval("and", 1, true), None);
    }

    #[test]
    fn null_and_mismatched_types_do_not_fold() {
        assert_eq!(eval("=", Scalar::Null, Scalar::Null), None);
        assert_eq!(eval("+", Scalar::Null, 1), None);
        assert_eq!(eval("=", "1", 1), None);
        assert_eq!(eval("+", "a", 1), None);
        assert_eq!(eval("LIKE", "a", "a"), None);
    }

    #[test]
    fn string_concatenation() {
        assert_eq!(eval("+", "foo", "bar"), Some(Scalar::Str("foobar".into())));
    }
}
