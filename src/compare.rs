//! Relational comparison between dynamically typed values.
//!
//! Same-kind scalars compare natively. An int against a float compares as two
//! floats. A number against a string parses the string as the number's kind and
//! compares numerically; when the string does not parse, every operator yields
//! `false`. Lists and objects have no ordering and are rejected with
//! [`EvalError::UnsupportedComparison`].

use std::borrow::Cow;

use crate::{ast::CompareOp, evaluator::EvalError, value::Value};

fn apply<T: PartialOrd + ?Sized>(left: &T, right: &T, op: CompareOp) -> bool {
    match op {
        CompareOp::Equal => left == right,
        CompareOp::NotEqual => left != right,
        CompareOp::GreaterThan => left > right,
        CompareOp::GreaterEqual => left >= right,
        CompareOp::LessThan => left < right,
        CompareOp::LessEqual => left <= right,
    }
}

pub fn compare_int_to_int(left: i64, right: i64, op: CompareOp) -> bool {
    apply(&left, &right, op)
}

pub fn compare_float_to_float(left: f64, right: f64, op: CompareOp) -> bool {
    apply(&left, &right, op)
}

pub fn compare_string_to_string(left: &str, right: &str, op: CompareOp) -> bool {
    apply(left, right, op)
}

pub fn compare_int_to_float(left: i64, right: f64, op: CompareOp) -> bool {
    compare_float_to_float(left as f64, right, op)
}

pub fn compare_float_to_int(left: f64, right: i64, op: CompareOp) -> bool {
    compare_float_to_float(left, right as f64, op)
}

pub fn compare_int_to_string(left: i64, right: &str, op: CompareOp) -> bool {
    match right.parse::<i64>() {
        Ok(right) => compare_int_to_int(left, right, op),
        Err(_) => false,
    }
}

pub fn compare_string_to_int(left: &str, right: i64, op: CompareOp) -> bool {
    match left.parse::<i64>() {
        Ok(left) => compare_int_to_int(left, right, op),
        Err(_) => false,
    }
}

pub fn compare_float_to_string(left: f64, right: &str, op: CompareOp) -> bool {
    match right.parse::<f64>() {
        Ok(right) => compare_float_to_float(left, right, op),
        Err(_) => false,
    }
}

pub fn compare_string_to_float(left: &str, right: f64, op: CompareOp) -> bool {
    match left.parse::<f64>() {
        Ok(left) => compare_float_to_float(left, right, op),
        Err(_) => false,
    }
}

/// An absent side takes the zero value of the other side's kind.
/// Two absent sides both become `0.0`.
fn inherit_absent<'a>(left: &'a Value, right: &'a Value) -> (Cow<'a, Value>, Cow<'a, Value>) {
    match (left, right) {
        (Value::Absent, other) => (Cow::Owned(Value::zero_of(other.kind())), Cow::Borrowed(right)),
        (other, Value::Absent) => (Cow::Borrowed(left), Cow::Owned(Value::zero_of(other.kind()))),
        _ => (Cow::Borrowed(left), Cow::Borrowed(right)),
    }
}

/// Compare two resolved operands.
///
/// # Examples
///
/// ```
/// use evq::{ast::CompareOp, compare::compare, Value};
///
/// let five = Value::Int(5);
/// assert!(compare(&five, CompareOp::LessThan, &Value::Float(5.5)).unwrap());
/// assert!(compare(&five, CompareOp::Equal, &Value::String("5".into())).unwrap());
/// assert!(!compare(&five, CompareOp::NotEqual, &Value::String("five".into())).unwrap());
/// ```
pub fn compare(left: &Value, op: CompareOp, right: &Value) -> Result<bool, EvalError> {
    if left.is_absent() && right.is_absent() {
        return Ok(compare_float_to_float(0.0, 0.0, op));
    }

    let (left, right) = inherit_absent(left, right);

    let result = match (left.as_ref(), right.as_ref()) {
        (Value::Int(l), Value::Int(r)) => compare_int_to_int(*l, *r, op),
        (Value::Float(l), Value::Float(r)) => compare_float_to_float(*l, *r, op),
        (Value::String(l), Value::String(r)) => compare_string_to_string(l, r, op),
        (Value::Int(l), Value::Float(r)) => compare_int_to_float(*l, *r, op),
        (Value::Float(l), Value::Int(r)) => compare_float_to_int(*l, *r, op),
        (Value::Int(l), Value::String(r)) => compare_int_to_string(*l, r, op),
        (Value::String(l), Value::Int(r)) => compare_string_to_int(l, *r, op),
        (Value::Float(l), Value::String(r)) => compare_float_to_string(*l, r, op),
        (Value::String(l), Value::Float(r)) => compare_string_to_float(l, *r, op),
        (l, r) => {
            return Err(EvalError::UnsupportedComparison {
                left: l.kind(),
                op,
                right: r.kind(),
            });
        }
    };

    Ok(result)
}
