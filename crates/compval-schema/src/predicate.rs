//! # Predicate Library
//!
//! Pure boolean checks used as the atoms of field rules. Every predicate
//! takes a [`FieldValue`] (or a string extracted from one) and returns
//! `false` when the value has a shape it does not understand. None of them
//! can fail or panic.
//!
//! [`Constraint`](crate::Constraint) binds these functions to names and
//! parameters; this module only holds the checks themselves.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use compval_core::FieldValue;
use regex::Regex;
use serde_json::Value;

/// Semantic version anchored at the end of the input: `MAJOR.MINOR.PATCH`,
/// optional `-PRERELEASE` and `+BUILD`, no leading zeros in numeric parts.
const SEMVER_SUFFIX: &str = concat!(
    r"(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)",
    r"(?:-((?:0|[1-9][0-9]*|[0-9]*[a-zA-Z-][0-9a-zA-Z-]*)",
    r"(?:\.(?:0|[1-9][0-9]*|[0-9]*[a-zA-Z-][0-9a-zA-Z-]*))*))?",
    r"(?:\+([0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*))?$",
);

fn semver_suffix() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(SEMVER_SUFFIX).expect("semver suffix pattern is valid"))
}

/// True iff the value is present (not missing, not `null`).
pub fn is_present(value: &FieldValue<'_>) -> bool {
    value.is_present()
}

/// True iff the value is present and not `""`, `[]` or `{}`.
pub fn is_not_empty(value: &FieldValue<'_>) -> bool {
    !value.is_empty()
}

/// True iff `input` is already in kebab-case.
pub fn is_kebab_case(input: &str) -> bool {
    input == to_kebab_case(input)
}

/// Convert `input` to kebab-case.
///
/// Words are split on `-`, `_` and whitespace, and on case boundaries: a
/// lowercase letter followed by an uppercase one (`myPipeline`), and the
/// last capital of an acronym followed by a lowercase letter
/// (`HTTPServer`). Words are lowercased and joined with single hyphens.
/// Every other character, dots and digits included, is kept in place.
pub fn to_kebab_case(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c == '_' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || (prev.is_uppercase() && next_is_lower) {
                words.push(std::mem::take(&mut current));
            }
        }
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words.join("-")
}

/// True iff `input` ends with a semantic version.
pub fn has_semver_suffix(input: &str) -> bool {
    semver_suffix().is_match(input)
}

/// True iff the value is a non-empty mapping holding `key: expected`.
pub fn mapping_contains_entry(value: &FieldValue<'_>, key: &str, expected: &str) -> bool {
    value
        .as_mapping()
        .filter(|map| !map.is_empty())
        .and_then(|map| map.get(key))
        .and_then(Value::as_str)
        .is_some_and(|found| found == expected)
}

/// True iff the value is a sequence of strings that equals `allowed` as a
/// set, with no duplicates and no extra members.
pub fn is_exact_set(value: &FieldValue<'_>, allowed: &[String]) -> bool {
    let Some(items) = value.as_sequence() else {
        return false;
    };
    let allowed: BTreeSet<&str> = allowed.iter().map(String::as_str).collect();
    let mut found = BTreeSet::new();
    for item in items {
        match item.as_str() {
            Some(s) => {
                found.insert(s);
            }
            None => return false,
        }
    }
    items.len() == allowed.len() && found == allowed
}

/// True iff the value is a sequence.
pub fn is_sequence(value: &FieldValue<'_>) -> bool {
    value.as_sequence().is_some()
}
