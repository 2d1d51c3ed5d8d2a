use crate::value::Value;
use std::cmp::Ordering;

/// Total canonical comparator shared by index ordering and merge comparators.
///
/// Ordering rules:
/// 1. Kind tag order
/// 2. Kind-specific comparison for same-kind values
///
/// Floats use IEEE total ordering so the comparator agrees with the ordered
/// byte encoding for every bit pattern, including `-0.0` and NaN payloads.
#[must_use]
pub fn canonical_cmp(left: &Value, right: &Value) -> Ordering {
    strict_order_cmp(left, right).unwrap_or_else(|| left.tag().cmp(&right.tag()))
}

/// Strict comparator for same-kind values.
///
/// Returns `None` for mismatched kinds.
#[must_use]
pub fn strict_order_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Id(a), Value::Id(b)) => Some(a.cmp(b)),
        (Value::Text(a), Value::Text(b)) => Some(a.as_bytes().cmp(b.as_bytes())),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Float(a), Value::Float(b)) => Some(a.total_cmp(b)),
        (Value::Blob(a), Value::Blob(b)) => Some(a.cmp(b)),
        _ => None,
    }
}
