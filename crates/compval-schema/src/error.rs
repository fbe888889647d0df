//! Schema definition errors.
//!
//! These are raised while building or registering schemas, never while
//! validating documents: a constraint violation is data, not an error.

use compval_core::PathError;
use thiserror::Error;

/// Errors raised while building the schema registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A field rule names a malformed path.
    #[error("invalid field path: {0}")]
    Path(#[from] PathError),

    /// A schema was registered under an empty kind.
    #[error("cannot register a schema under an empty kind")]
    EmptyKind,

    /// A dive rule was declared on the document root.
    #[error("dive rule for {kind} must name a sequence field, not the document root")]
    RootDive {
        /// Kind whose schema holds the rule.
        kind: String,
    },
}
