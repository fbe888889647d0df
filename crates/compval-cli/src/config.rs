//! # Configuration File
//!
//! Optional YAML file passed with `--config`:
//!
//! ```yaml
//! policy:
//!   forbid_component_in_name: false
//!   security_context: independent     # or short-circuit
//! schemas:
//!   StepAction:
//!     rules:
//!       - path: apiVersion
//!         constraints:
//!           - check: required
//!           - check: equals
//!             value: tekton.dev/v1alpha1
//! templates:
//!   kebab-case: "Key '{field}': {observed} is not kebab-case"
//! ```
//!
//! Every section is optional. Schemas listed here are registered after the
//! built-in ones, so a kind named here replaces its built-in schema.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use compval_schema::{Schema, SchemaPolicy, Validator};

/// Parsed `--config` file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorConfig {
    pub policy: SchemaPolicy,
    /// Additional kinds, keyed by kind.
    pub schemas: BTreeMap<String, Schema>,
    /// Message template overrides, keyed by constraint name.
    pub templates: BTreeMap<String, String>,
}

impl ValidatorConfig {
    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Parse configuration YAML. Blank input yields the defaults.
    pub fn from_yaml(source: &str) -> Result<Self> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(source).context("failed to parse config YAML")
    }

    /// Build a validator: built-in schemas under `policy`, then the
    /// configured schemas and templates.
    pub fn build_validator(&self) -> Result<Validator> {
        let mut validator =
            Validator::builtin(&self.policy).context("failed to build built-in schemas")?;
        for (kind, schema) in &self.schemas {
            validator
                .register_schema(kind, schema.clone())
                .with_context(|| format!("invalid schema for kind {kind:?}"))?;
        }
        for (constraint, template) in &self.templates {
            validator.translator_mut().set_template(constraint, template);
        }
        tracing::debug!(
            kinds = ?validator.registry().kinds(),
            templates = self.templates.len(),
            "validator configured"
        );
        Ok(validator)
    }
}
