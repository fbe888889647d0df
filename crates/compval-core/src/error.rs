//! # Error Types
//!
//! Errors raised while turning raw manifest bytes into routable documents.
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - Decode errors carry the origin (file path or label) and the position
//!   of the offending document inside a multi-document stream.
//! - Structural document errors are per-document: they stop rule
//!   evaluation for that document only.
//! - Constraint violations are NOT errors and never appear here.

use std::path::PathBuf;

use thiserror::Error;

/// A document that cannot be routed to a schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// The decoded document is a scalar or a sequence.
    #[error("document is not a mapping (found {found})")]
    NotAMapping {
        /// Shape of the value found at the document root.
        found: &'static str,
    },

    /// The document carries no usable `kind` discriminator.
    #[error("document has no kind")]
    MissingKind,

    /// The document carries a `kind` but no `apiVersion`.
    #[error("{kind} document has no apiVersion")]
    MissingApiVersion {
        /// Kind of the document missing its version.
        kind: String,
    },
}

/// A malformed dotted field path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// Two consecutive dots, or a leading/trailing dot.
    #[error("field path {path:?} has an empty segment at position {position}")]
    EmptySegment {
        /// The raw path as written.
        path: String,
        /// Zero-based index of the empty segment.
        position: usize,
    },
}

/// Failure to read or decode a manifest stream.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The manifest file could not be read.
    #[error("failed to read manifest at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// One document of the stream is not valid YAML/JSON.
    #[error("failed to parse document {index} of {origin}: {source}")]
    Yaml {
        origin: String,
        index: usize,
        source: serde_yaml::Error,
    },
}
