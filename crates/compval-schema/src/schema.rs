//! # Schemas and Field Rules
//!
//! A [`Schema`] is the ordered list of [`FieldRule`]s that applies to one
//! document kind. Declaration order is significant: it is the order in
//! which rules are evaluated and therefore the order of reported
//! violations.
//!
//! Schemas are built once, either in code through the builder methods or
//! from configuration through `serde`, and are read-only afterwards.

use compval_core::FieldPath;
use serde::{Deserialize, Serialize};

use crate::constraint::Constraint;
use crate::error::SchemaError;

/// How a field rule reaches the values it checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case", deny_unknown_fields)]
pub enum Traversal {
    /// Check the value at the rule's path.
    #[default]
    Scalar,
    /// The rule's path holds a sequence; check `item` (relative to each
    /// element, root = the element itself) for every element.
    Dive {
        #[serde(default)]
        item: FieldPath,
    },
}

/// One (path → constraints) binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldRule {
    pub path: FieldPath,
    pub constraints: Vec<Constraint>,
    #[serde(default)]
    pub traversal: Traversal,
    /// When this rule reports a violation, skip every later rule whose path
    /// lies under this scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_circuit: Option<FieldPath>,
}

impl FieldRule {
    /// A rule on the value at `path`.
    pub fn scalar(
        path: &str,
        constraints: impl IntoIterator<Item = Constraint>,
    ) -> Result<Self, SchemaError> {
        Ok(Self {
            path: FieldPath::parse(path)?,
            constraints: constraints.into_iter().collect(),
            traversal: Traversal::Scalar,
            short_circuit: None,
        })
    }

    /// A rule on `item` inside every element of the sequence at `path`.
    pub fn dive(
        path: &str,
        item: &str,
        constraints: impl IntoIterator<Item = Constraint>,
    ) -> Result<Self, SchemaError> {
        Ok(Self {
            path: FieldPath::parse(path)?,
            constraints: constraints.into_iter().collect(),
            traversal: Traversal::Dive {
                item: FieldPath::parse(item)?,
            },
            short_circuit: None,
        })
    }

    /// Skip later rules under `scope` once this rule fails.
    pub fn halting(mut self, scope: &str) -> Result<Self, SchemaError> {
        self.short_circuit = Some(FieldPath::parse(scope)?);
        Ok(self)
    }

    pub fn is_dive(&self) -> bool {
        matches!(self.traversal, Traversal::Dive { .. })
    }
}

/// The ordered rules for one kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Schema {
    rules: Vec<FieldRule>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rules(rules: Vec<FieldRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Append a prepared rule.
    pub fn rule(mut self, rule: FieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Append a scalar rule.
    pub fn field(
        self,
        path: &str,
        constraints: impl IntoIterator<Item = Constraint>,
    ) -> Result<Self, SchemaError> {
        Ok(self.rule(FieldRule::scalar(path, constraints)?))
    }

    /// Append a dive rule.
    pub fn dive(
        self,
        path: &str,
        item: &str,
        constraints: impl IntoIterator<Item = Constraint>,
    ) -> Result<Self, SchemaError> {
        Ok(self.rule(FieldRule::dive(path, item, constraints)?))
    }
}
