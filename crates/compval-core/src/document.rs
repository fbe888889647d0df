//! # Documents
//!
//! One decoded manifest. The document owns its attribute tree and exposes
//! the three well-known header fields used for routing and attribution:
//! `kind`, `apiVersion` and `metadata.name`.
//!
//! A [`Document`] can be built from any `serde_json::Value`; whether it is
//! routable is only decided when [`Document::header`] is called. This keeps
//! structural failures per-document instead of failing a whole batch at
//! decode time.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DocumentError;
use crate::path::FieldPath;
use crate::value::FieldValue;

/// A decoded manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    body: Value,
}

/// The routing header of a structurally sound document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentHeader<'a> {
    pub kind: &'a str,
    pub api_version: &'a str,
    /// `metadata.name`, when present and a string.
    pub name: Option<&'a str>,
}

impl Document {
    pub fn new(body: Value) -> Self {
        Self { body }
    }

    /// The full attribute tree.
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// The `kind` discriminator, if it is a non-empty string.
    pub fn kind(&self) -> Option<&str> {
        top_level_str(&self.body, "kind")
    }

    /// The `apiVersion`, if it is a non-empty string.
    pub fn api_version(&self) -> Option<&str> {
        top_level_str(&self.body, "apiVersion")
    }

    /// The identifying name, `metadata.name`.
    pub fn name(&self) -> Option<&str> {
        self.body
            .get("metadata")
            .and_then(|metadata| metadata.get("name"))
            .and_then(Value::as_str)
    }

    /// Resolve a field path against this document.
    pub fn lookup(&self, path: &FieldPath) -> FieldValue<'_> {
        path.resolve(&self.body)
    }

    /// Extract the routing header.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentError`] if the root is not a mapping or if `kind`
    /// or `apiVersion` are missing.
    pub fn header(&self) -> Result<DocumentHeader<'_>, DocumentError> {
        if !self.body.is_object() {
            return Err(DocumentError::NotAMapping {
                found: FieldValue::from_value(&self.body).shape(),
            });
        }
        let kind = self.kind().ok_or(DocumentError::MissingKind)?;
        let api_version = self
            .api_version()
            .ok_or_else(|| DocumentError::MissingApiVersion {
                kind: kind.to_string(),
            })?;
        Ok(DocumentHeader {
            kind,
            api_version,
            name: self.name(),
        })
    }
}

impl From<Value> for Document {
    fn from(body: Value) -> Self {
        Self::new(body)
    }
}

fn top_level_str<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}
