//! # Rule Evaluator
//!
//! Walks a [`Schema`]'s field rules over one [`Document`] and collects a
//! [`Violation`] for every failed constraint.
//!
//! ## Algorithm
//!
//! Rules run in declaration order. For each rule the field is resolved and
//! its constraints are checked in order:
//!
//! - An absent field whose rule lists `required` yields that single
//!   violation, and every later rule under the same path is skipped: a
//!   missing parent is reported once, not once per descendant.
//! - An absent field without `required` is only checked by constraints that
//!   read absence as an empty collection (see
//!   [`Constraint::applies_to_absent`]).
//! - A dive rule checks each element of the sequence independently and tags
//!   its violations with the element position. An absent sequence yields
//!   nothing; any other non-sequence yields one `sequence` violation.
//! - A rule with a short-circuit scope that reports anything skips every
//!   later rule under that scope.
//!
//! Evaluation never fails and never panics. It is pure apart from the
//! returned vector.

use std::fmt;

use compval_core::{Document, FieldPath, FieldValue};

use crate::constraint::Constraint;
use crate::schema::{FieldRule, Schema, Traversal};

/// Name used for documents without `metadata.name`.
pub const UNNAMED: &str = "<unnamed>";

/// One failed constraint evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub kind: String,
    /// `metadata.name` of the document, or [`UNNAMED`].
    pub name: String,
    /// Dotted path of the failing field, `path[i].sub` for dive elements.
    pub field: String,
    /// Element position for dive rules.
    pub index: Option<usize>,
    pub constraint: Constraint,
    /// Rendered value found at the field; empty when absent.
    pub observed: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} {}: {} (observed {:?})",
            self.kind, self.name, self.field, self.constraint, self.observed
        )
    }
}

/// Evaluate `schema` against `document`.
pub fn evaluate(document: &Document, schema: &Schema) -> Vec<Violation> {
    let mut walk = Walk {
        kind: document.kind().unwrap_or_default(),
        name: document.name().unwrap_or(UNNAMED),
        violations: Vec::new(),
        skipped: Vec::new(),
    };

    for rule in schema.rules() {
        if walk.is_skipped(&rule.path) {
            continue;
        }
        let reported = match &rule.traversal {
            Traversal::Scalar => walk.scalar(document, rule),
            Traversal::Dive { item } => walk.dive(document, rule, item),
        };
        if reported {
            if let Some(scope) = &rule.short_circuit {
                walk.skipped.push(scope.clone());
            }
        }
    }
    walk.violations
}

/// Constraints of `constraints` that `value` fails, in declaration order.
fn failing<'c>(value: &FieldValue<'_>, constraints: &'c [Constraint]) -> Vec<&'c Constraint> {
    if value.is_absent() {
        if let Some(required) = constraints.iter().find(|c| c.is_required()) {
            return vec![required];
        }
        return constraints
            .iter()
            .filter(|c| c.applies_to_absent() && !c.check(value))
            .collect();
    }
    constraints.iter().filter(|c| !c.check(value)).collect()
}

struct Walk<'d> {
    kind: &'d str,
    name: &'d str,
    violations: Vec<Violation>,
    /// Scopes whose descendants are no longer evaluated.
    skipped: Vec<FieldPath>,
}

impl Walk<'_> {
    fn is_skipped(&self, path: &FieldPath) -> bool {
        self.skipped.iter().any(|scope| path.starts_with(scope))
    }

    fn push(&mut self, field: String, index: Option<usize>, constraint: &Constraint, value: &FieldValue<'_>) {
        self.violations.push(Violation {
            kind: self.kind.to_string(),
            name: self.name.to_string(),
            field,
            index,
            constraint: constraint.clone(),
            observed: value.render(),
        });
    }

    /// Returns true if the rule reported anything.
    fn scalar(&mut self, document: &Document, rule: &FieldRule) -> bool {
        let value = document.lookup(&rule.path);
        let failed = failing(&value, &rule.constraints);
        if failed.is_empty() {
            return false;
        }
        if value.is_absent() && failed.iter().any(|c| c.is_required()) {
            self.skipped.push(rule.path.clone());
        }
        for constraint in failed {
            self.push(rule.path.to_string(), None, constraint, &value);
        }
        true
    }

    fn dive(&mut self, document: &Document, rule: &FieldRule, item: &FieldPath) -> bool {
        let items = match document.lookup(&rule.path) {
            FieldValue::Absent => return false,
            FieldValue::Sequence(items) => items,
            other => {
                self.push(rule.path.to_string(), None, &Constraint::Sequence, &other);
                return true;
            }
        };

        let mut reported = false;
        for (index, element) in items.iter().enumerate() {
            let value = item.resolve(element);
            let failed = failing(&value, &rule.constraints);
            if failed.is_empty() {
                continue;
            }
            let field = element_field(&rule.path, index, item);
            for constraint in failed {
                self.push(field.clone(), Some(index), constraint, &value);
            }
            reported = true;
        }
        reported
    }
}

fn element_field(path: &FieldPath, index: usize, item: &FieldPath) -> String {
    if item.is_root() {
        format!("{path}[{index}]")
    } else {
        format!("{path}[{index}].{item}")
    }
}
