//! Field operators and value comparison.

use serde_json::{Map, Value};
use std::cmp::Ordering;

use super::{match_document, match_field, QueryError};

/// An operator document is a non-empty object whose keys are all operators.
pub(super) fn is_operator_doc(map: &Map<String, Value>) -> bool {
    !map.is_empty() && map.keys().all(|k| k.starts_with('$'))
}

/// Literal match: deep equality, or membership when the field is an array.
/// A `null` literal also matches an absent field.
pub(super) fn literal_matches(value: Option<&Value>, literal: &Value) -> bool {
    match value {
        None => literal.is_null(),
        Some(v) if values_equal(v, literal) => true,
        Some(Value::Array(items)) => items.iter().any(|item| values_equal(item, literal)),
        Some(_) => false,
    }
}

pub(super) fn apply_operator(
    op: &str,
    operand: &Value,
    value: Option<&Value>,
) -> Result<bool, QueryError> {
    let matched = match op {
        "$eq" => literal_matches(value, operand),
        "$ne" => !literal_matches(value, operand),
        "$gt" => ordered(value, operand, |o| o == Ordering::Greater),
        "$gte" => ordered(value, operand, |o| o != Ordering::Less),
        "$lt" => ordered(value, operand, |o| o == Ordering::Less),
        "$lte" => ordered(value, operand, |o| o != Ordering::Greater),
        "$in" => operand_array(op, operand)?
            .iter()
            .any(|candidate| literal_matches(value, candidate)),
        "$nin" => !operand_array(op, operand)?
            .iter()
            .any(|candidate| literal_matches(value, candidate)),
        "$exists" => {
            let wanted = operand.as_bool().ok_or_else(|| invalid(op, "a boolean"))?;
            value.is_some() == wanted
        }
        "$all" => {
            let required = operand_array(op, operand)?;
            match value {
                Some(Value::Array(items)) => required
                    .iter()
                    .all(|r| items.iter().any(|item| values_equal(item, r))),
                _ => false,
            }
        }
        "$size" => {
            let size = operand
                .as_u64()
                .ok_or_else(|| invalid(op, "a non-negative integer"))?;
            matches!(value, Some(Value::Array(items)) if items.len() as u64 == size)
        }
        "$elemMatch" => {
            let sub = operand
                .as_object()
                .ok_or_else(|| invalid(op, "a query object"))?;
            match value {
                Some(Value::Array(items)) => {
                    let mut any = false;
                    for item in items {
                        let hit = if is_operator_doc(sub) {
                            match_field(Some(item), operand)?
                        } else {
                            match item.as_object() {
                                Some(doc) => match_document(sub, doc)?,
                                None => false,
                            }
                        };
                        if hit {
                            any = true;
                            break;
                        }
                    }
                    any
                }
                _ => false,
            }
        }
        "$not" => !match_field(value, operand)?,
        other => return Err(QueryError::UnknownOperator(other.to_string())),
    };

    Ok(matched)
}

/// Compare a field (or any element of an array field) against an operand.
fn ordered(value: Option<&Value>, operand: &Value, accept: impl Fn(Ordering) -> bool) -> bool {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .any(|item| compare(item, operand).is_some_and(&accept)),
        Some(v) => compare(v, operand).is_some_and(accept),
        None => false,
    }
}

/// Ordering is only defined between two numbers or two strings.
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Deep equality that treats `10` and `10.0` as the same number.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y || x.as_f64() == y.as_f64(),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| values_equal(x, y)))
        }
        _ => a == b,
    }
}

fn operand_array<'a>(op: &str, operand: &'a Value) -> Result<&'a Vec<Value>, QueryError> {
    operand.as_array().ok_or_else(|| invalid(op, "an array"))
}

fn invalid(op: &str, expected: &'static str) -> QueryError {
    QueryError::InvalidOperand {
        operator: op.to_string(),
        expected,
    }
}
