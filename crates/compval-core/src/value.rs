//! # Field Values
//!
//! The tagged result of resolving a [`FieldPath`](crate::FieldPath) against
//! a document. Predicates match on these four shapes instead of asserting a
//! concrete type at runtime; a shape a predicate does not expect simply
//! fails the predicate.
//!
//! An explicit `null` is folded into [`FieldValue::Absent`]: for routing
//! and `required` checks, `key: ~` and a missing key mean the same thing.

use std::fmt;

use serde_json::{Map, Number, Value};

/// A scalar leaf of the attribute tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    Bool(bool),
    Number(&'a Number),
    String(&'a str),
}

impl fmt::Display for Scalar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Number(n) => write!(f, "{n}"),
            Scalar::String(s) => f.write_str(s),
        }
    }
}

/// The value found at a field path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    /// Nothing at this path (missing key, `null`, or an unwalkable parent).
    Absent,
    Scalar(Scalar<'a>),
    Mapping(&'a Map<String, Value>),
    Sequence(&'a [Value]),
}

impl<'a> FieldValue<'a> {
    /// Classify a present value.
    pub fn from_value(value: &'a Value) -> Self {
        match value {
            Value::Null => FieldValue::Absent,
            Value::Bool(b) => FieldValue::Scalar(Scalar::Bool(*b)),
            Value::Number(n) => FieldValue::Scalar(Scalar::Number(n)),
            Value::String(s) => FieldValue::Scalar(Scalar::String(s)),
            Value::Array(items) => FieldValue::Sequence(items),
            Value::Object(map) => FieldValue::Mapping(map),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    pub fn is_present(&self) -> bool {
        !self.is_absent()
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match *self {
            FieldValue::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            FieldValue::Scalar(Scalar::Bool(b)) => Some(b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            FieldValue::Scalar(Scalar::Number(n)) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&'a Map<String, Value>> {
        match *self {
            FieldValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&'a [Value]> {
        match *self {
            FieldValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// True for absence, `""`, `[]` and `{}`. Booleans and numbers are
    /// never empty, including `false` and `0`.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Absent => true,
            FieldValue::Scalar(Scalar::String(s)) => s.is_empty(),
            FieldValue::Scalar(_) => false,
            FieldValue::Mapping(map) => map.is_empty(),
            FieldValue::Sequence(items) => items.is_empty(),
        }
    }

    /// Short name of the shape, for diagnostics.
    pub fn shape(&self) -> &'static str {
        match self {
            FieldValue::Absent => "absent",
            FieldValue::Scalar(Scalar::Bool(_)) => "boolean",
            FieldValue::Scalar(Scalar::Number(_)) => "number",
            FieldValue::Scalar(Scalar::String(_)) => "string",
            FieldValue::Mapping(_) => "mapping",
            FieldValue::Sequence(_) => "sequence",
        }
    }

    /// Render the observed value for a diagnostic message.
    ///
    /// Strings are rendered bare; collections as compact JSON; absence as
    /// the empty string.
    pub fn render(&self) -> String {
        match self {
            FieldValue::Absent => String::new(),
            FieldValue::Scalar(scalar) => scalar.to_string(),
            FieldValue::Mapping(map) => serde_json::to_string(map).unwrap_or_default(),
            FieldValue::Sequence(items) => serde_json::to_string(items).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_is_absent() {
        assert!(FieldValue::from_value(&Value::Null).is_absent());
    }

    #[test]
    fn test_empty_but_present_values_are_not_absent() {
        let empty_string = json!("");
        let empty_sequence = json!([]);
        let zero = json!(0);
        let no = json!(false);
        for value in [&empty_string, &empty_sequence, &zero, &no] {
            assert!(
                FieldValue::from_value(value).is_present(),
                "{value} should be present"
            );
        }
    }

    #[test]
    fn test_is_empty_distinguishes_zero_from_empty() {
        assert!(FieldValue::from_value(&json!("")).is_empty());
        assert!(FieldValue::from_value(&json!([])).is_empty());
        assert!(FieldValue::from_value(&json!({})).is_empty());
        assert!(!FieldValue::from_value(&json!(0)).is_empty());
        assert!(!FieldValue::from_value(&json!(false)).is_empty());
        assert!(!FieldValue::from_value(&json!("x")).is_empty());
    }

    #[test]
    fn test_accessors_reject_other_shapes() {
        let number = json!(1001);
        let value = FieldValue::from_value(&number);
        assert_eq!(value.as_i64(), Some(1001));
        assert_eq!(value.as_str(), None);
        assert_eq!(value.as_bool(), None);
        assert!(value.as_mapping().is_none());
        assert!(value.as_sequence().is_none());
    }

    #[test]
    fn test_render() {
        assert_eq!(FieldValue::from_value(&json!("Localhost")).render(), "Localhost");
        assert_eq!(FieldValue::from_value(&json!(true)).render(), "true");
        assert_eq!(FieldValue::from_value(&json!(0)).render(), "0");
        assert_eq!(FieldValue::from_value(&json!(["all"])).render(), r#"["all"]"#);
        assert_eq!(FieldValue::from_value(&json!({"a": 1})).render(), r#"{"a":1}"#);
        assert_eq!(FieldValue::Absent.render(), "");
    }

    #[test]
    fn test_shape_names() {
        assert_eq!(FieldValue::Absent.shape(), "absent");
        assert_eq!(FieldValue::from_value(&json!("x")).shape(), "string");
        assert_eq!(FieldValue::from_value(&json!({})).shape(), "mapping");
        assert_eq!(FieldValue::from_value(&json!([])).shape(), "sequence");
    }
}
