//! # Schema Registry
//!
//! Maps a document `kind` to the [`Schema`] that validates it. The registry
//! is filled once at start-up and read-only afterwards: registration takes
//! `&mut self`, lookups take `&self`.
//!
//! ## Built-in Kinds
//!
//! | kind | apiVersion |
//! |------|------------|
//! | `Task` | `tekton.dev/v1` |
//! | `Pipeline` | `tekton.dev/v1` |
//! | `Component` | `supply-chain.apps.tanzu.vmware.com/v1alpha1` |
//!
//! Two historical variations of these schemas are selected through
//! [`SchemaPolicy`]: whether a component name may contain the word
//! `component`, and whether a failed security-context check hides the
//! remaining security-context checks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constraint::Constraint;
use crate::error::SchemaError;
use crate::schema::{FieldRule, Schema, Traversal};

/// API version of Tekton `Task` and `Pipeline` documents.
pub const TEKTON_API_VERSION: &str = "tekton.dev/v1";

/// API version of supply-chain `Component` documents.
pub const COMPONENT_API_VERSION: &str = "supply-chain.apps.tanzu.vmware.com/v1alpha1";

/// Label every component must carry to be published in the catalog.
pub const CATALOG_LABEL_KEY: &str = "supply-chain.apps.tanzu.vmware.com/catalog";

/// Required value of [`CATALOG_LABEL_KEY`].
pub const CATALOG_LABEL_VALUE: &str = "tanzu";

/// Fragment a component name must not contain under
/// [`SchemaPolicy::forbid_component_in_name`].
pub const FORBIDDEN_NAME_FRAGMENT: &str = "component";

const SECURITY_CONTEXT: &str = "spec.stepTemplate.securityContext";

/// How security-context failures of a `Task` interact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SecurityContextMode {
    /// Every security-context check is reported.
    #[default]
    Independent,
    /// A failed `runAsNonRoot`, `runAsUser` or `seccompProfile.type` check
    /// hides every later check under `spec.stepTemplate.securityContext`.
    ShortCircuit,
}

/// Variations of the built-in schemas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchemaPolicy {
    /// Reject component names containing `component`.
    pub forbid_component_in_name: bool,
    pub security_context: SecurityContextMode,
}

/// Kind → schema lookup table.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, Schema>,
}

impl SchemaRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the `Task`, `Pipeline` and `Component` schemas.
    ///
    /// # Errors
    ///
    /// Only fails if a built-in field path is malformed.
    pub fn builtin(policy: &SchemaPolicy) -> Result<Self, SchemaError> {
        let mut registry = Self::new();
        registry.register("Task", task_schema(policy)?)?;
        registry.register("Pipeline", pipeline_schema()?)?;
        registry.register("Component", component_schema(policy)?)?;
        Ok(registry)
    }

    /// Register `schema` for `kind`, replacing any previous schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::EmptyKind`] for a blank kind and
    /// [`SchemaError::RootDive`] for a dive rule on the document root.
    pub fn register(&mut self, kind: &str, schema: Schema) -> Result<(), SchemaError> {
        if kind.trim().is_empty() {
            return Err(SchemaError::EmptyKind);
        }
        let root_dive = schema
            .rules()
            .iter()
            .any(|rule| matches!(rule.traversal, Traversal::Dive { .. }) && rule.path.is_root());
        if root_dive {
            return Err(SchemaError::RootDive {
                kind: kind.to_string(),
            });
        }
        if self.schemas.insert(kind.to_string(), schema).is_some() {
            tracing::warn!(kind, "replaced previously registered schema");
        } else {
            tracing::debug!(kind, "registered schema");
        }
        Ok(())
    }

    pub fn lookup(&self, kind: &str) -> Option<&Schema> {
        self.schemas.get(kind)
    }

    /// Registered kinds, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        self.schemas.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Built-in schemas
// ---------------------------------------------------------------------------

fn header(schema: Schema, api_version: &str, kind: &str) -> Result<Schema, SchemaError> {
    schema
        .field("apiVersion", [Constraint::Required, Constraint::equals(api_version)])?
        .field("kind", [Constraint::Required, Constraint::equals(kind)])
}

/// Tekton `Task`: header, kebab-case names, hardened step security context.
pub fn task_schema(policy: &SchemaPolicy) -> Result<Schema, SchemaError> {
    let halting = |rule: FieldRule| -> Result<FieldRule, SchemaError> {
        match policy.security_context {
            SecurityContextMode::Independent => Ok(rule),
            SecurityContextMode::ShortCircuit => rule.halting(SECURITY_CONTEXT),
        }
    };
    let at = |field: &str| format!("{SECURITY_CONTEXT}.{field}");

    let schema = header(Schema::new(), TEKTON_API_VERSION, "Task")?
        .field("metadata", [Constraint::Required])?
        .field("metadata.name", [Constraint::Required, Constraint::KebabCase])?
        .field("spec", [Constraint::Required])?
        .dive("spec.params", "name", [Constraint::Required, Constraint::KebabCase])?
        .dive("spec.results", "name", [Constraint::Required, Constraint::KebabCase])?
        .field("spec.stepTemplate", [Constraint::Required])?
        .field(SECURITY_CONTEXT, [Constraint::Required])?
        .field(&at("allowPrivilegeEscalation"), [Constraint::equals(false)])?
        .field(&at("capabilities"), [Constraint::Required])?
        .field(&at("capabilities.drop"), [Constraint::exact_set(["ALL"])])?
        .rule(halting(FieldRule::scalar(
            &at("runAsNonRoot"),
            [Constraint::Required, Constraint::equals(true)],
        )?)?)
        .rule(halting(FieldRule::scalar(
            &at("runAsUser"),
            [Constraint::Required, Constraint::not_equals(0i64)],
        )?)?)
        .field(&at("seccompProfile"), [Constraint::Required])?
        .rule(halting(FieldRule::scalar(
            &at("seccompProfile.type"),
            [Constraint::Required, Constraint::equals("RuntimeDefault")],
        )?)?);
    Ok(schema)
}

/// Tekton `Pipeline`: header and a kebab-case name.
pub fn pipeline_schema() -> Result<Schema, SchemaError> {
    header(Schema::new(), TEKTON_API_VERSION, "Pipeline")?
        .field("metadata.name", [Constraint::Required, Constraint::KebabCase])
}

/// Supply-chain `Component`: versioned kebab-case name, catalog label,
/// description and a pipeline run.
pub fn component_schema(policy: &SchemaPolicy) -> Result<Schema, SchemaError> {
    let mut name = vec![
        Constraint::Required,
        Constraint::KebabCase,
        Constraint::ContainsSemver,
    ];
    if policy.forbid_component_in_name {
        name.push(Constraint::not_contains(FORBIDDEN_NAME_FRAGMENT));
    }

    header(Schema::new(), COMPONENT_API_VERSION, "Component")?
        .field("metadata.name", name)?
        .field(
            "metadata.labels",
            [Constraint::mapping_contains_entry(CATALOG_LABEL_KEY, CATALOG_LABEL_VALUE)],
        )?
        .field("spec", [Constraint::Required])?
        .field("spec.description", [Constraint::Required, Constraint::NotEmpty])?
        .field("spec.pipelineRun", [Constraint::Required])?
        .dive(
            "spec.pipelineRun.params",
            "name",
            [Constraint::Required, Constraint::KebabCase],
        )?
        .field("spec.pipelineRun.pipelineRef", [Constraint::Required])?
        .field(
            "spec.pipelineRun.pipelineRef.name",
            [Constraint::Required, Constraint::KebabCase],
        )
}
