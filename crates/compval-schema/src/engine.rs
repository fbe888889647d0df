//! # Validation Engine
//!
//! [`Validator`] ties the registry, the evaluator and the translator
//! together and is the single entry point for callers:
//!
//! ```text
//! documents ──► header ──► registry lookup ──► evaluate ──► translate
//!                 │              │
//!                 ▼              ▼
//!           structural      unrecognized
//!             failure           kind
//! ```
//!
//! Every document ends in exactly one [`DocumentOutcome`]. The outcomes of
//! a batch are folded, in input order, into one [`ValidationResult`].
//!
//! ## Concurrency
//!
//! Validation borrows the validator immutably and holds no interior
//! mutability, so a `Validator` is `Send + Sync` and can be shared across
//! threads once built. Registration needs `&mut self` and therefore cannot
//! race with validation.

use std::fmt;

use compval_core::{Document, DocumentError};

use crate::error::SchemaError;
use crate::evaluate::{evaluate, Violation, UNNAMED};
use crate::registry::{SchemaPolicy, SchemaRegistry};
use crate::schema::Schema;
use crate::translate::Translator;

/// A document that could not be routed to a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralFailure {
    /// Zero-based position of the document in its batch.
    pub index: usize,
    pub error: DocumentError,
}

impl fmt::Display for StructuralFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "document {}: {}", self.index, self.error)
    }
}

/// What happened to one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOutcome {
    /// The document was evaluated against its kind's schema.
    Checked {
        kind: String,
        name: String,
        violations: Vec<Violation>,
        messages: Vec<String>,
    },
    /// No schema is registered for the document's kind.
    Unrecognized { kind: String },
    /// The document is not routable.
    Failed(StructuralFailure),
}

/// Aggregate outcome of one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    messages: Vec<String>,
    violations: Vec<Violation>,
    failures: Vec<StructuralFailure>,
    unrecognized_kinds: Vec<String>,
    documents: usize,
}

impl ValidationResult {
    /// Fold per-document outcomes, in order, into one result.
    pub fn aggregate(outcomes: impl IntoIterator<Item = DocumentOutcome>) -> Self {
        let mut result = Self::default();
        for outcome in outcomes {
            result.documents += 1;
            match outcome {
                DocumentOutcome::Checked {
                    violations,
                    messages,
                    ..
                } => {
                    result.violations.extend(violations);
                    result.messages.extend(messages);
                }
                DocumentOutcome::Unrecognized { kind } => result.unrecognized_kinds.push(kind),
                DocumentOutcome::Failed(failure) => {
                    result.messages.push(failure.to_string());
                    result.failures.push(failure);
                }
            }
        }
        result
    }

    /// True iff no violation and no structural failure was produced.
    pub fn is_pass(&self) -> bool {
        self.violations.is_empty() && self.failures.is_empty()
    }

    /// Rendered diagnostics in document order, then rule order, then
    /// element position. Structural failures appear at their document's
    /// position.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn failures(&self) -> &[StructuralFailure] {
        &self.failures
    }

    /// Kinds seen without a registered schema, once per document.
    pub fn unrecognized_kinds(&self) -> &[String] {
        &self.unrecognized_kinds
    }

    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    /// Number of documents in the batch.
    pub fn document_count(&self) -> usize {
        self.documents
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages.join("; "))
    }
}

/// The validation engine.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    registry: SchemaRegistry,
    translator: Translator,
}

impl Validator {
    pub fn new(registry: SchemaRegistry, translator: Translator) -> Self {
        Self {
            registry,
            translator,
        }
    }

    /// A validator for the built-in kinds with English messages.
    ///
    /// # Errors
    ///
    /// Propagates [`SchemaRegistry::builtin`] failures.
    pub fn builtin(policy: &SchemaPolicy) -> Result<Self, SchemaError> {
        Ok(Self::new(SchemaRegistry::builtin(policy)?, Translator::english()))
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    pub fn translator_mut(&mut self) -> &mut Translator {
        &mut self.translator
    }

    /// Add or replace the schema of `kind`.
    ///
    /// # Errors
    ///
    /// See [`SchemaRegistry::register`].
    pub fn register_schema(&mut self, kind: &str, schema: Schema) -> Result<(), SchemaError> {
        self.registry.register(kind, schema)
    }

    /// Validate one document. `index` is its position in the batch.
    pub fn validate_document(&self, index: usize, document: &Document) -> DocumentOutcome {
        let header = match document.header() {
            Ok(header) => header,
            Err(error) => {
                tracing::warn!(index, %error, "skipping structurally invalid document");
                return DocumentOutcome::Failed(StructuralFailure { index, error });
            }
        };

        let Some(schema) = self.registry.lookup(header.kind) else {
            tracing::info!("no validation specified for {}", header.kind);
            return DocumentOutcome::Unrecognized {
                kind: header.kind.to_string(),
            };
        };

        let name = header.name.unwrap_or(UNNAMED);
        let violations = evaluate(document, schema);
        let messages = self.translator.translate(header.kind, name, &violations);
        tracing::debug!(
            index,
            kind = header.kind,
            name,
            violations = violations.len(),
            "validated document"
        );
        DocumentOutcome::Checked {
            kind: header.kind.to_string(),
            name: name.to_string(),
            violations,
            messages,
        }
    }

    /// Validate every document of a batch and aggregate the outcomes.
    pub fn validate_batch(&self, documents: &[Document]) -> ValidationResult {
        ValidationResult::aggregate(
            documents
                .iter()
                .enumerate()
                .map(|(index, document)| self.validate_document(index, document)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::Constraint;
    use serde_json::json;

    fn validator() -> Validator {
        Validator::builtin(&SchemaPolicy::default()).unwrap()
    }

    #[test]
    fn test_validator_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Validator>();
        assert_send_sync::<ValidationResult>();
    }

    #[test]
    fn test_empty_batch_passes() {
        let result = validator().validate_batch(&[]);
        assert!(result.is_pass());
        assert_eq!(result.document_count(), 0);
        assert_eq!(result.to_string(), "");
    }

    #[test]
    fn test_unrecognized_kind_is_recorded() {
        let documents = vec![Document::new(json!({
            "apiVersion": "v1",
            "kind": "ConfigMap",
            "metadata": {"name": "Anything_Goes"}
        }))];
        let result = validator().validate_batch(&documents);
        assert!(result.is_pass());
        assert_eq!(result.unrecognized_kinds(), &["ConfigMap".to_string()]);
        assert!(result.messages().is_empty());
    }

    #[test]
    fn test_structural_failure_fails_batch_but_not_siblings() {
        let documents = vec![
            Document::new(json!(["not", "a", "mapping"])),
            Document::new(json!({"kind": "Pipeline", "metadata": {"name": "x"}})),
            Document::new(json!({
                "apiVersion": "tekton.dev/v1",
                "kind": "Pipeline",
                "metadata": {"name": "badName"}
            })),
        ];
        let result = validator().validate_batch(&documents);
        assert!(!result.is_pass());
        assert_eq!(result.failures().len(), 2);
        assert_eq!(result.failures()[0].index, 0);
        assert_eq!(
            result.failures()[1].error,
            DocumentError::MissingApiVersion {
                kind: "Pipeline".to_string()
            }
        );
        assert_eq!(result.violation_count(), 1);
        assert_eq!(
            result.messages()[2],
            "Pipeline/badName Key 'metadata.name': badName does not appear to be in kebab-case"
        );
    }

    #[test]
    fn test_registered_schema_is_used() {
        let mut validator = validator();
        validator
            .register_schema(
                "StepAction",
                Schema::new()
                    .field("apiVersion", [Constraint::equals("tekton.dev/v1alpha1")])
                    .unwrap(),
            )
            .unwrap();
        let documents = vec![Document::new(json!({
            "apiVersion": "tekton.dev/v1",
            "kind": "StepAction",
            "metadata": {"name": "step"}
        }))];
        let result = validator.validate_batch(&documents);
        assert_eq!(
            result.to_string(),
            "StepAction/step Key 'apiVersion': Expected tekton.dev/v1 to equal tekton.dev/v1alpha1"
        );
    }

    #[test]
    fn test_translator_override_applies_to_batch() {
        let mut validator = validator();
        validator
            .translator_mut()
            .set_template("kebab-case", "Key '{field}': {observed} is not kebab-case");
        let documents = vec![Document::new(json!({
            "apiVersion": "tekton.dev/v1",
            "kind": "Pipeline",
            "metadata": {"name": "myPipeline"}
        }))];
        assert_eq!(
            validator.validate_batch(&documents).to_string(),
            "Pipeline/myPipeline Key 'metadata.name': myPipeline is not kebab-case"
        );
    }
}
