//! # compval-schema: Declarative Manifest Validation
//!
//! The validation engine of compval: named predicates, per-kind schemas,
//! the rule evaluator, and the aggregation and translation of violations
//! into stable diagnostic messages.
//!
//! ## Layers
//!
//! - [`predicate`] / [`constraint`]: pure checks and their named,
//!   parameterised form. Shape mismatches fail the check; they are never
//!   runtime errors.
//! - [`schema`] / [`registry`]: ordered field rules per kind, with the
//!   built-in `Task`, `Pipeline` and `Component` schemas.
//! - [`evaluate`]: applies one schema to one document.
//! - [`translate`] / [`engine`]: renders violations and folds a batch
//!   into one [`ValidationResult`].
//!
//! ## Example
//!
//! ```
//! use compval_core::decode_documents;
//! use compval_schema::{SchemaPolicy, Validator};
//!
//! let documents = decode_documents(
//!     "apiVersion: tekton.dev/v1\nkind: Pipeline\nmetadata:\n  name: myPipeline\n",
//!     "inline",
//! )
//! .unwrap();
//! let validator = Validator::builtin(&SchemaPolicy::default()).unwrap();
//! let result = validator.validate_batch(&documents);
//! assert_eq!(
//!     result.to_string(),
//!     "Pipeline/myPipeline Key 'metadata.name': myPipeline does not appear to be in kebab-case",
//! );
//! ```
//!
//! ## Crate Policy
//!
//! - Depends only on `compval-core` internally.
//! - Never writes to stdout/stderr and never exits; the only side effect
//!   is `tracing` events. Installing a subscriber is the caller's job.
//! - Constraint violations are data ([`Violation`]), not errors.

pub mod constraint;
pub mod engine;
pub mod error;
pub mod evaluate;
pub mod predicate;
pub mod registry;
pub mod schema;
pub mod translate;

pub use constraint::{Constraint, Literal};
pub use engine::{DocumentOutcome, StructuralFailure, ValidationResult, Validator};
pub use error::SchemaError;
pub use evaluate::{evaluate, Violation, UNNAMED};
pub use registry::{
    SchemaPolicy, SchemaRegistry, SecurityContextMode, CATALOG_LABEL_KEY, CATALOG_LABEL_VALUE,
    COMPONENT_API_VERSION, TEKTON_API_VERSION,
};
pub use schema::{FieldRule, Schema, Traversal};
pub use translate::Translator;
