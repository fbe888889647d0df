//! # Field Paths
//!
//! Dotted locators into a document's attribute tree, e.g.
//! `spec.stepTemplate.securityContext.runAsUser`. Segments are mapping keys;
//! there is no index syntax because sequence elements are reached through
//! dive rules, not through paths.
//!
//! The empty path is the root. It addresses the value a path is resolved
//! against, which is how dive rules check sequence elements themselves.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PathError;
use crate::value::FieldValue;

/// A parsed dotted field path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// The empty path.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Parse a dotted path. The empty string parses to [`FieldPath::root`].
    ///
    /// # Errors
    ///
    /// Returns [`PathError::EmptySegment`] for `a..b`, `.a` or `a.`.
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        if raw.is_empty() {
            return Ok(Self::root());
        }
        let segments: Vec<String> = raw.split('.').map(str::to_string).collect();
        if let Some(position) = segments.iter().position(String::is_empty) {
            return Err(PathError::EmptySegment {
                path: raw.to_string(),
                position,
            });
        }
        Ok(Self(segments))
    }

    /// The individual mapping keys of this path.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// True for the empty path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// True if `self` equals `prefix` or lies underneath it.
    pub fn starts_with(&self, prefix: &FieldPath) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Concatenate two paths.
    pub fn join(&self, tail: &FieldPath) -> FieldPath {
        let mut segments = self.0.clone();
        segments.extend(tail.0.iter().cloned());
        FieldPath(segments)
    }

    /// Resolve this path against a value tree.
    ///
    /// Walking into a scalar or a sequence, or through a missing key,
    /// yields [`FieldValue::Absent`].
    pub fn resolve<'a>(&self, root: &'a Value) -> FieldValue<'a> {
        let mut current = root;
        for segment in &self.0 {
            match current {
                Value::Object(map) => match map.get(segment) {
                    Some(next) => current = next,
                    None => return FieldValue::Absent,
                },
                _ => return FieldValue::Absent,
            }
        }
        FieldValue::from_value(current)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl FromStr for FieldPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FieldPath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_parse_dotted_path() {
        let path = FieldPath::parse("spec.stepTemplate.securityContext").unwrap();
        assert_eq!(
            path.segments(),
            &["spec", "stepTemplate", "securityContext"]
        );
        assert_eq!(path.to_string(), "spec.stepTemplate.securityContext");
    }

    #[test]
    fn test_empty_string_is_root() {
        let path = FieldPath::parse("").unwrap();
        assert!(path.is_root());
        assert_eq!(path.to_string(), "");
    }

    #[test]
    fn test_empty_segments_rejected() {
        for raw in ["a..b", ".a", "a."] {
            let err = FieldPath::parse(raw).unwrap_err();
            assert!(
                matches!(err, PathError::EmptySegment { .. }),
                "expected EmptySegment for {raw:?}, got {err}"
            );
        }
    }

    #[test]
    fn test_starts_with_prefix_and_self() {
        let scope = FieldPath::parse("spec.stepTemplate").unwrap();
        let inner = FieldPath::parse("spec.stepTemplate.securityContext").unwrap();
        let sibling = FieldPath::parse("spec.params").unwrap();
        assert!(inner.starts_with(&scope));
        assert!(scope.starts_with(&scope));
        assert!(!sibling.starts_with(&scope));
        assert!(!scope.starts_with(&inner));
    }

    #[test]
    fn test_join_with_root_is_identity() {
        let path = FieldPath::parse("spec.params").unwrap();
        assert_eq!(path.join(&FieldPath::root()), path);
        let name = FieldPath::parse("name").unwrap();
        assert_eq!(path.join(&name).to_string(), "spec.params.name");
    }

    #[test]
    fn test_resolve_nested_mapping() {
        let doc = json!({"spec": {"stepTemplate": {"securityContext": {"runAsUser": 1001}}}});
        let path = FieldPath::parse("spec.stepTemplate.securityContext.runAsUser").unwrap();
        assert_eq!(path.resolve(&doc).as_i64(), Some(1001));
    }

    #[test]
    fn test_resolve_through_scalar_is_absent() {
        let doc = json!({"spec": "not-a-mapping"});
        let path = FieldPath::parse("spec.description").unwrap();
        assert!(path.resolve(&doc).is_absent());
    }

    #[test]
    fn test_resolve_through_sequence_is_absent() {
        let doc = json!({"spec": [{"description": "x"}]});
        let path = FieldPath::parse("spec.description").unwrap();
        assert!(path.resolve(&doc).is_absent());
    }

    #[test]
    fn test_root_resolves_to_value_itself() {
        let element = json!("ALL");
        assert_eq!(FieldPath::root().resolve(&element).as_str(), Some("ALL"));
    }

    #[test]
    fn test_deserialize_from_yaml_string() {
        let path: FieldPath = serde_yaml::from_str("metadata.labels").unwrap();
        assert_eq!(path.segments(), &["metadata", "labels"]);
        let bad: Result<FieldPath, _> = serde_yaml::from_str("metadata..labels");
        assert!(bad.is_err());
    }

    proptest! {
        #[test]
        fn prop_joined_path_lies_under_its_head(
            head in proptest::collection::vec("[a-zA-Z][a-zA-Z0-9]{0,8}", 0..4),
            tail in proptest::collection::vec("[a-zA-Z][a-zA-Z0-9]{0,8}", 0..4),
        ) {
            let head = FieldPath::parse(&head.join(".")).unwrap();
            let tail = FieldPath::parse(&tail.join(".")).unwrap();
            let joined = head.join(&tail);
            prop_assert!(joined.starts_with(&head));
            prop_assert_eq!(
                joined.segments().len(),
                head.segments().len() + tail.segments().len()
            );
        }
    }
}
