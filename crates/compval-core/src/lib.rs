//! # compval-core: Manifest Document Model
//!
//! This crate is the leaf of the compval workspace. It defines how a decoded
//! manifest looks in memory and how the validation engine addresses parts
//! of it. It knows nothing about schemas or constraints.
//!
//! ## Key Design Principles
//!
//! 1. **One generic tree.** Every manifest, whatever its `kind`, is a
//!    `serde_json::Value` tree wrapped in a [`Document`]. YAML input is
//!    converted into the same tree by [`decode`].
//!
//! 2. **Absence is a value.** [`FieldValue::Absent`] is distinct from an
//!    empty string, an empty sequence or zero. `required` checks depend on
//!    this distinction.
//!
//! 3. **Tagged shapes, no runtime casts.** Field lookups return
//!    [`FieldValue`], a closed enum of absent / scalar / mapping / sequence.
//!    Consumers match on it explicitly.
//!
//! 4. **Structural errors are typed.** A document that cannot be routed to
//!    a schema (not a mapping, no `kind`, no `apiVersion`) produces a
//!    [`DocumentError`], never a panic.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `compval-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod decode;
pub mod document;
pub mod error;
pub mod path;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use decode::{decode_documents, load_documents};
pub use document::{Document, DocumentHeader};
pub use error::{DecodeError, DocumentError, PathError};
pub use path::FieldPath;
pub use value::{FieldValue, Scalar};
