//! Documents and value ordering
//!
//! A `Document` is the storage-side shape of one record: a map from storage
//! field name to JSON value. The primary key is carried separately as a
//! [`RecordId`](crate::RecordId) and never appears inside the document.
//!
//! ## Absence vs null
//!
//! A field excluded by a projection is absent from the map. It must never be
//! materialized as `Value::Null`, an empty string, or a zero value; callers
//! observe it as "not set".

use std::cmp::Ordering;
use std::collections::BTreeMap;

pub use serde_json::Value;

/// One stored record body, keyed by storage field name
pub type Document = BTreeMap<String, Value>;

/// Total, deterministic ordering across JSON values, used by backend sorts
///
/// Values of different types order by type rank:
/// null < bool < number < string < array < object.
/// Numbers compare as `f64`, strings lexicographically, arrays element-wise
/// then by length, objects by entry count only (sort keys are expected to be
/// scalars; object-valued sort fields merely need a stable order).
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => {
            for (xv, yv) in x.iter().zip(y.iter()) {
                let ord = compare_values(xv, yv);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        (Value::Object(x), Value::Object(y)) => x.len().cmp(&y.len()),
        _ => rank(a).cmp(&rank(b)),
    }
}
