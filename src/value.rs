//! The dynamic shape of the values stored in a [`NodeList`](crate::NodeList).
//!
//! Values are plain [`serde_json::Value`]s. This module tags them with a
//! [`ValueKind`], counts their elements, and provides the two equality
//! disciplines and the default ordering used by the list algorithms.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::cmp::Ordering;
use std::fmt;

/// Tag describing the dynamic shape of a value at the time it was assigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Null,
    Boolean,
    Integer,
    Float,
    String,
    Sequence,
    Mapping,
}

impl ValueKind {
    /// Infer the kind of `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use node_list::ValueKind;
    /// use serde_json::json;
    ///
    /// assert_eq!(ValueKind::of(&json!(1)), ValueKind::Integer);
    /// assert_eq!(ValueKind::of(&json!(1.5)), ValueKind::Float);
    /// assert_eq!(ValueKind::of(&json!([1, 2])), ValueKind::Sequence);
    /// assert_eq!(ValueKind::of(&json!({"a": 1})), ValueKind::Mapping);
    /// ```
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Number(n) if n.is_f64() => ValueKind::Float,
            Value::Number(_) => ValueKind::Integer,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Sequence,
            Value::Object(_) => ValueKind::Mapping,
        }
    }

    /// The lowercase name used in labels and serialized records.
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::Sequence => "sequence",
            ValueKind::Mapping => "mapping",
        }
    }

    // integers and floats share a rank so that they compare numerically
    fn rank(self) -> u8 {
        match self {
            ValueKind::Null => 0,
            ValueKind::Boolean => 1,
            ValueKind::Integer | ValueKind::Float => 2,
            ValueKind::String => 3,
            ValueKind::Sequence => 4,
            ValueKind::Mapping => 5,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Element count of a countable aggregate (sequence or mapping), or 1 for
/// any scalar.
pub fn cardinality(value: &Value) -> usize {
    match value {
        Value::Array(items) => items.len(),
        Value::Object(entries) => entries.len(),
        _ => 1,
    }
}

/// Truthiness of a value, as used by loose equality.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(entries) => !entries.is_empty(),
    }
}

/// Loose equality between two values.
///
/// Numbers compare numerically regardless of their representation, numeric
/// strings compare as numbers, booleans compare against the truthiness of
/// the other side, and `null` equals the empty string and every other falsy
/// non-string value. Aggregates compare element-wise (sequences) or
/// key-wise (mappings) with the same rules.
///
/// # Examples
///
/// ```
/// use node_list::value::loose_eq;
/// use serde_json::json;
///
/// assert!(loose_eq(&json!(1), &json!(1.0)));
/// assert!(loose_eq(&json!("2"), &json!(2)));
/// assert!(loose_eq(&json!(true), &json!("yes")));
/// assert!(!loose_eq(&json!("a"), &json!(0)));
/// ```
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Bool(x), other) | (other, Value::Bool(x)) => *x == is_truthy(other),
        (Value::Null, Value::Null) => true,
        (Value::Null, Value::String(s)) | (Value::String(s), Value::Null) => s.is_empty(),
        (Value::Null, other) | (other, Value::Null) => !is_truthy(other),
        (Value::Number(x), Value::Number(y)) => numbers_eq(x, y),
        (Value::Number(x), Value::String(s)) | (Value::String(s), Value::Number(x)) => {
            numeric(s).map_or(false, |f| x.as_f64() == Some(f))
        }
        (Value::String(x), Value::String(y)) => match (numeric(x), numeric(y)) {
            (Some(f), Some(g)) => f == g,
            _ => x == y,
        },
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| loose_eq(a, b))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(key, a)| y.get(key).map_or(false, |b| loose_eq(a, b)))
        }
        _ => false,
    }
}

/// Default total ordering of values, used by [`NodeList::sort`].
///
/// Values of different kinds are ordered `null < boolean < number < string
/// < sequence < mapping`.
///
/// [`NodeList::sort`]: crate::NodeList::sort
pub fn compare(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => compare_all(x.iter(), y.iter())
            .unwrap_or_else(|| x.len().cmp(&y.len())),
        (Value::Object(x), Value::Object(y)) => x
            .len()
            .cmp(&y.len())
            .then_with(|| compare_all(x.values(), y.values()).unwrap_or(Ordering::Equal)),
        _ => ValueKind::of(a).rank().cmp(&ValueKind::of(b).rank()),
    }
}

fn compare_all<'a>(
    xs: impl Iterator<Item = &'a Value>,
    ys: impl Iterator<Item = &'a Value>,
) -> Option<Ordering> {
    xs.zip(ys)
        .map(|(x, y)| compare(x, y))
        .find(|ordering| ordering.is_ne())
}

fn compare_numbers(x: &Number, y: &Number) -> Ordering {
    match (x.as_i64(), y.as_i64()) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => match (x.as_u64(), y.as_u64()) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => as_float(x).total_cmp(&as_float(y)),
        },
    }
}

fn numbers_eq(x: &Number, y: &Number) -> bool {
    compare_numbers(x, y).is_eq()
}

fn as_float(n: &Number) -> f64 {
    n.as_f64().unwrap_or(f64::NAN)
}

fn numeric(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kinds_and_cardinality() {
        assert_eq!(ValueKind::of(&Value::Null), ValueKind::Null);
        assert_eq!(ValueKind::of(&json!(false)), ValueKind::Boolean);
        assert_eq!(ValueKind::of(&json!(u64::MAX)), ValueKind::Integer);
        assert_eq!(ValueKind::of(&json!("x")), ValueKind::String);
        assert_eq!(ValueKind::Sequence.to_string(), "sequence");

        assert_eq!(cardinality(&json!([1, 2, 3])), 3);
        assert_eq!(cardinality(&json!([])), 0);
        assert_eq!(cardinality(&json!({"a": 1, "b": 2})), 2);
        assert_eq!(cardinality(&json!("abc")), 1);
        assert_eq!(cardinality(&Value::Null), 1);
    }

    #[test]
    fn kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(ValueKind::Mapping).unwrap(),
            json!("mapping")
        );
    }

    #[test]
    fn loose_equality() {
        assert!(loose_eq(&json!(0), &json!(0.0)));
        assert!(loose_eq(&json!(" 3 "), &json!(3)));
        assert!(loose_eq(&json!("1e1"), &json!("10")));
        assert!(!loose_eq(&json!("abc"), &json!("ABC")));
        assert!(loose_eq(&json!(false), &json!([])));
        assert!(loose_eq(&Value::Null, &json!(0)));
        assert!(loose_eq(&Value::Null, &json!("")));
        assert!(!loose_eq(&Value::Null, &json!("0")));
        assert!(!loose_eq(&Value::Null, &json!(1)));
        assert!(loose_eq(&json!([1, "2"]), &json!([1.0, 2])));
        assert!(loose_eq(&json!({"a": "1"}), &json!({"a": 1})));
        assert!(!loose_eq(&json!({"a": 1}), &json!({"b": 1})));
        assert!(!loose_eq(&json!("a"), &json!(["a"])));
    }

    #[test]
    fn strict_equality_keeps_representation() {
        assert_ne!(json!(1), json!(1.0));
        assert_ne!(json!("1"), json!(1));
    }

    #[test]
    fn default_ordering() {
        let mut values = vec![
            json!("b"),
            json!(2.5),
            json!(null),
            json!([1]),
            json!(true),
            json!(-1),
            json!("a"),
            json!({}),
        ];
        values.sort_by(compare);
        assert_eq!(
            values,
            vec![
                json!(null),
                json!(true),
                json!(-1),
                json!(2.5),
                json!("a"),
                json!("b"),
                json!([1]),
                json!({}),
            ]
        );
        assert_eq!(compare(&json!([1, 2]), &json!([1])), Ordering::Greater);
        assert_eq!(compare(&json!(1), &json!(1.0)), Ordering::Equal);
        assert_eq!(compare(&json!(u64::MAX), &json!(-1)), Ordering::Greater);
    }
}
