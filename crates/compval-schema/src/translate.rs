//! # Violation Translation
//!
//! Renders [`Violation`]s into stable, human-readable messages. Each
//! constraint name maps to a template with three placeholders:
//!
//! - `{field}`: dotted path of the failing field (`path[i].sub` in dives)
//! - `{observed}`: the value found there
//! - `{param}`: the constraint parameter
//!
//! Every rendered message is prefixed with `{kind}/{name} `. The default
//! English templates can be overridden per constraint name, for example
//! from the CLI configuration file.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::evaluate::Violation;

/// Template used for a constraint name with no registered template.
pub const FALLBACK_TEMPLATE: &str = "Key '{field}': failed on the '{constraint}' check";

const ENGLISH: &[(&str, &str)] = &[
    ("required", "Key '{field}': is required"),
    ("equals", "Key '{field}': Expected {observed} to equal {param}"),
    ("not-equals", "Key '{field}': Expected {observed} to not equal {param}"),
    ("kebab-case", "Key '{field}': {observed} does not appear to be in kebab-case"),
    ("contains-semver", "Key '{field}': {observed} Does not end in a semantic version"),
    ("not-contains", "Key '{field}': {observed} must not contain '{param}'"),
    ("not-empty", "Key '{field}': must not be empty"),
    ("mapping-contains-entry", "Key '{field}': Does not contain the key/value '{param}'"),
    ("exact-set", "Key '{field}': Must only contain the values [{param}]"),
    ("sequence", "Key '{field}': Expected a sequence but found {observed}"),
];

fn placeholder() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\{(field|observed|param|constraint)\}").expect("placeholder pattern is valid")
    })
}

/// Constraint name → message template.
#[derive(Debug, Clone)]
pub struct Translator {
    templates: BTreeMap<String, String>,
}

impl Default for Translator {
    fn default() -> Self {
        Self::english()
    }
}

impl Translator {
    /// The default English templates.
    pub fn english() -> Self {
        Self {
            templates: ENGLISH
                .iter()
                .map(|(name, template)| (name.to_string(), template.to_string()))
                .collect(),
        }
    }

    /// Builder-style [`set_template`](Self::set_template).
    pub fn with_template(mut self, constraint: &str, template: &str) -> Self {
        self.set_template(constraint, template);
        self
    }

    /// Override the template for one constraint name.
    pub fn set_template(&mut self, constraint: &str, template: &str) {
        if !self.templates.contains_key(constraint) {
            tracing::debug!(constraint, "template registered for a constraint with no default");
        }
        self.templates
            .insert(constraint.to_string(), template.to_string());
    }

    pub fn template(&self, constraint: &str) -> Option<&str> {
        self.templates.get(constraint).map(String::as_str)
    }

    /// Render one violation, without the document prefix.
    ///
    /// Placeholders are substituted in one pass over the template, so text
    /// taken from the document is never itself expanded.
    pub fn render(&self, violation: &Violation) -> String {
        let name = violation.constraint.name();
        let template = self.template(name).unwrap_or(FALLBACK_TEMPLATE);
        let param = violation.constraint.param().unwrap_or_default();
        placeholder()
            .replace_all(template, |caps: &Captures<'_>| match &caps[1] {
                "field" => violation.field.as_str(),
                "observed" => violation.observed.as_str(),
                "param" => param.as_str(),
                _ => name,
            })
            .into_owned()
    }

    /// Render the violations of one document, each prefixed with
    /// `{kind}/{name} `.
    pub fn translate(&self, kind: &str, name: &str, violations: &[Violation]) -> Vec<String> {
        violations
            .iter()
            .map(|violation| format!("{kind}/{name} {}", self.render(violation)))
            .collect()
    }
}
