//! # Constraints
//!
//! A [`Constraint`] is a named predicate plus its parameter. Constraints
//! are plain data: they can be declared in Rust (the built-in schemas) or
//! deserialized from a configuration file, and they carry no state.
//!
//! The constraint name returned by [`Constraint::name`] is the key used by
//! the [`Translator`](crate::Translator) to pick a message template.
//!
//! ## Absent fields
//!
//! Scalar predicates (`equals`, `kebab-case`, ...) are never evaluated
//! against an absent field. Collection predicates (`mapping-contains-entry`,
//! `exact-set`) are: they treat absence as the empty collection and fail.
//! See [`Constraint::applies_to_absent`].

use std::fmt;

use compval_core::FieldValue;
use serde::{Deserialize, Serialize};

use crate::predicate;

/// A literal parameter of an equality check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Bool(bool),
    Integer(i64),
    Text(String),
}

impl Literal {
    /// Compare against a field value of the same shape.
    ///
    /// Returns `None` when the shapes differ (a string field compared to a
    /// boolean literal, a mapping, an absent field).
    pub fn compare(&self, value: &FieldValue<'_>) -> Option<bool> {
        match self {
            Literal::Bool(expected) => value.as_bool().map(|found| found == *expected),
            Literal::Integer(expected) => value.as_i64().map(|found| found == *expected),
            Literal::Text(expected) => value.as_str().map(|found| found == expected.as_str()),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Integer(i) => write!(f, "{i}"),
            Literal::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::Text(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::Text(s)
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Bool(b)
    }
}

impl From<i64> for Literal {
    fn from(i: i64) -> Self {
        Literal::Integer(i)
    }
}

/// A named predicate with its parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "check", rename_all = "kebab-case")]
pub enum Constraint {
    /// The field must be present.
    Required,
    /// The field must equal the literal exactly.
    Equals { value: Literal },
    /// The field must have the literal's shape and differ from it.
    NotEquals { value: Literal },
    /// The string field must already be in kebab-case.
    KebabCase,
    /// The string field must end in a semantic version.
    ContainsSemver,
    /// The string field must not contain the fragment.
    NotContains { value: String },
    /// The field must not be `""`, `[]` or `{}`.
    NotEmpty,
    /// The field must be a non-empty mapping holding `key: value`.
    MappingContainsEntry { key: String, value: String },
    /// The field must be a sequence holding exactly these strings.
    ExactSet { values: Vec<String> },
    /// The field must be a sequence.
    Sequence,
}

impl Constraint {
    pub fn equals(value: impl Into<Literal>) -> Self {
        Constraint::Equals {
            value: value.into(),
        }
    }

    pub fn not_equals(value: impl Into<Literal>) -> Self {
        Constraint::NotEquals {
            value: value.into(),
        }
    }

    pub fn not_contains(fragment: impl Into<String>) -> Self {
        Constraint::NotContains {
            value: fragment.into(),
        }
    }

    pub fn mapping_contains_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        Constraint::MappingContainsEntry {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn exact_set<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Constraint::ExactSet {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Stable constraint name, used to select a message template.
    pub fn name(&self) -> &'static str {
        match self {
            Constraint::Required => "required",
            Constraint::Equals { .. } => "equals",
            Constraint::NotEquals { .. } => "not-equals",
            Constraint::KebabCase => "kebab-case",
            Constraint::ContainsSemver => "contains-semver",
            Constraint::NotContains { .. } => "not-contains",
            Constraint::NotEmpty => "not-empty",
            Constraint::MappingContainsEntry { .. } => "mapping-contains-entry",
            Constraint::ExactSet { .. } => "exact-set",
            Constraint::Sequence => "sequence",
        }
    }

    /// The parameter as it appears in messages, if the constraint has one.
    pub fn param(&self) -> Option<String> {
        match self {
            Constraint::Equals { value } | Constraint::NotEquals { value } => {
                Some(value.to_string())
            }
            Constraint::NotContains { value } => Some(value.clone()),
            Constraint::MappingContainsEntry { key, value } => Some(format!("{key}: {value}")),
            Constraint::ExactSet { values } => Some(values.join(", ")),
            Constraint::Required
            | Constraint::KebabCase
            | Constraint::ContainsSemver
            | Constraint::NotEmpty
            | Constraint::Sequence => None,
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, Constraint::Required)
    }

    /// Whether this constraint is evaluated when the field is absent.
    pub fn applies_to_absent(&self) -> bool {
        matches!(
            self,
            Constraint::Required
                | Constraint::MappingContainsEntry { .. }
                | Constraint::ExactSet { .. }
        )
    }

    /// Evaluate the constraint against a field value.
    pub fn check(&self, value: &FieldValue<'_>) -> bool {
        match self {
            Constraint::Required => predicate::is_present(value),
            Constraint::Equals { value: expected } => expected.compare(value) == Some(true),
            Constraint::NotEquals { value: unexpected } => {
                unexpected.compare(value) == Some(false)
            }
            Constraint::KebabCase => value.as_str().is_some_and(predicate::is_kebab_case),
            Constraint::ContainsSemver => value.as_str().is_some_and(predicate::has_semver_suffix),
            Constraint::NotContains { value: fragment } => value
                .as_str()
                .is_some_and(|s| !s.contains(fragment.as_str())),
            Constraint::NotEmpty => predicate::is_not_empty(value),
            Constraint::MappingContainsEntry { key, value: expected } => {
                predicate::mapping_contains_entry(value, key, expected)
            }
            Constraint::ExactSet { values } => predicate::is_exact_set(value, values),
            Constraint::Sequence => predicate::is_sequence(value),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.param() {
            Some(param) => write!(f, "{}({param})", self.name()),
            None => f.write_str(self.name()),
        }
    }
}
