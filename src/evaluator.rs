use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    ast::{AggregateMethod, ArithOp, CompareOp, Condition, Field},
    compare::compare,
    value::{Record, Value, ValueKind},
};

/// Errors that abort a query run.
///
/// These signal a query that cannot be applied to the data at all, as opposed
/// to soft failures (missing keys, non-numeric operands) that degrade to
/// absent, zero or false.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// The collection of an `IN` field did not evaluate to a list
    #[error("'{field}' is {found}, expected a list to iterate")]
    CollectionNotList { field: String, found: ValueKind },

    /// The operands of a condition have no defined comparison
    #[error("cannot compare {left} {op} {right}")]
    UnsupportedComparison {
        left: ValueKind,
        op: CompareOp,
        right: ValueKind,
    },

    /// A group accumulator held something other than a list
    #[error("group accumulator '{field}' is {found}, expected a list")]
    AccumulatorNotList { field: String, found: ValueKind },
}

/// Evaluates `field` against one record (or one group's accumulated lists).
///
/// # Examples
///
/// ```
/// use evq::{ast::Field, evaluator::evaluate, value::{Record, Value}};
///
/// let mut record = Record::new();
/// record.insert("amount".to_string(), Value::Int(5));
///
/// let value = evaluate(&record, &Field::property("amount")).unwrap();
/// assert_eq!(value, Value::Int(5));
/// assert_eq!(evaluate(&record, &Field::property("missing")).unwrap(), Value::Absent);
/// ```
pub fn evaluate(record: &Record, field: &Field) -> Result<Value, EvalError> {
    match field {
        Field::Property(name) => Ok(lookup(record, name)),
        Field::Literal { value, .. } => Ok(value.clone()),
        Field::Iter {
            name, collection, ..
        } => match evaluate(record, collection)? {
            Value::List(items) => Ok(Value::List(pluck(items, name))),
            other => Err(EvalError::CollectionNotList {
                field: collection.to_string(),
                found: other.kind(),
            }),
        },
        Field::BinaryExpr { op, left, right } => {
            let left = evaluate(record, left)?.as_float().unwrap_or(0.0);
            let right = evaluate(record, right)?.as_float().unwrap_or(0.0);
            Ok(Value::Float(match op {
                ArithOp::Multiply => multiply(left, right),
            }))
        }
        Field::Aggregate { method, target } => match evaluate(record, target)? {
            Value::List(items) => Ok(aggregate(*method, &items)),
            other => {
                debug!(field = %target, kind = %other.kind(), "aggregating a non-list yields no value");
                Ok(Value::Absent)
            }
        },
    }
}

/// Evaluates a condition: both operands are resolved against the record and
/// then compared.
pub fn eval_condition(record: &Record, condition: &Condition) -> Result<bool, EvalError> {
    let left = evaluate(record, &condition.left)?;
    let right = evaluate(record, &condition.right)?;
    compare(&left, condition.op, &right)
}

/// True when every condition holds.
///
/// Every condition is evaluated, so an unsupported comparison is reported even
/// when an earlier condition already failed.
pub fn eval_conditions(record: &Record, conditions: &[Condition]) -> Result<bool, EvalError> {
    let mut all = true;
    for condition in conditions {
        all &= eval_condition(record, condition)?;
    }
    Ok(all)
}

fn lookup(record: &Record, name: &str) -> Value {
    match record.get(name) {
        None => Value::Absent,
        Some(Value::Object(_)) => {
            warn!(property = name, "nested objects are not a supported value; treating as absent");
            Value::Absent
        }
        Some(value) => value.clone(),
    }
}

/// The value at `name` in every element that is a record. Other elements, and
/// records where the key is missing or holds no supported value (null,
/// boolean), are skipped.
fn pluck(items: Vec<Value>, name: &str) -> Vec<Value> {
    items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(mut obj) => obj.remove(name).filter(|v| !v.is_absent()),
            _ => None,
        })
        .collect()
}

// largest scale a Decimal holds; finer digits are rounded away
const MAX_SCALE: u32 = 28;

/// `x` as a Decimal, when the conversion loses nothing.
fn exact_decimal(x: f64) -> Option<Decimal> {
    Decimal::from_f64(x).filter(|d| d.to_f64() == Some(x))
}

fn multiply(a: f64, b: f64) -> f64 {
    if let Some(ad) = exact_decimal(a)
        && let Some(bd) = exact_decimal(b)
        && ad.scale() + bd.scale() <= MAX_SCALE
        && let Some(r) = ad.checked_mul(bd).and_then(|rd| rd.to_f64())
    {
        return r;
    }
    a * b
}

fn aggregate(method: AggregateMethod, items: &[Value]) -> Value {
    match method {
        AggregateMethod::Sum => sum(items),
        AggregateMethod::Count => Value::Int(items.len() as i64),
    }
}

/// Sums the numeric elements. Stays an integer unless a float is present or
/// the total leaves the `i64` range.
fn sum(items: &[Value]) -> Value {
    let mut sum_int: i128 = 0;
    let mut sum_float: f64 = 0.0;
    // None once a float element has no exact Decimal form
    let mut sum_decimal = Some(Decimal::ZERO);
    let mut has_float = false;

    for item in items {
        match item {
            Value::Int(n) => sum_int = sum_int.saturating_add(i128::from(*n)),
            Value::Float(n) => {
                has_float = true;
                sum_float += n;
                sum_decimal = sum_decimal
                    .zip(exact_decimal(*n))
                    .and_then(|(total, d)| total.checked_add(d));
            }
            _ => {}
        }
    }

    if !has_float {
        return match i64::try_from(sum_int) {
            Ok(total) => Value::Int(total),
            Err(_) => {
                debug!(total = %sum_int, "integer sum overflows i64; returning a float");
                Value::Float(sum_int as f64)
            }
        };
    }

    let exact = sum_decimal
        .zip(Decimal::from_i128(sum_int))
        .and_then(|(total, ints)| total.checked_add(ints))
        .and_then(|total| total.to_f64());
    Value::Float(exact.unwrap_or(sum_int as f64 + sum_float))
}
