//! # Manifest Decoding
//!
//! Splits a YAML or JSON byte stream into independent [`Document`]s.
//!
//! JSON is a subset of YAML, so a single `serde_yaml` multi-document
//! deserializer handles both formats. Each document is deserialized
//! straight into a `serde_json::Value` tree so the validation engine works
//! over one value model regardless of the input format.
//!
//! Empty documents (a bare `---`, or a stream with a leading separator)
//! are skipped. A document that fails to parse fails the whole stream:
//! validation cannot run on input it cannot see.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::document::Document;
use crate::error::DecodeError;

/// Read a manifest file and decode every document in it.
///
/// # Errors
///
/// Returns [`DecodeError::Read`] if the file cannot be read, or the
/// errors of [`decode_documents`].
pub fn load_documents(path: &Path) -> Result<Vec<Document>, DecodeError> {
    let content = std::fs::read_to_string(path).map_err(|source| DecodeError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    decode_documents(&content, &path.display().to_string())
}

/// Decode a `---`-separated stream of YAML or JSON documents.
///
/// `origin` labels the stream in error messages (usually a file path).
/// Scalar mapping keys are read as strings; non-finite floats become
/// `null`.
///
/// # Errors
///
/// Returns [`DecodeError::Yaml`] for a document that is not valid YAML or
/// that has no JSON equivalent (complex mapping keys, tagged values).
pub fn decode_documents(source: &str, origin: &str) -> Result<Vec<Document>, DecodeError> {
    let mut documents = Vec::new();
    for (index, deserializer) in serde_yaml::Deserializer::from_str(source).enumerate() {
        let body = Value::deserialize(deserializer).map_err(|source| DecodeError::Yaml {
            origin: origin.to_string(),
            index,
            source,
        })?;
        if body.is_null() {
            continue;
        }
        documents.push(Document::new(body));
    }
    Ok(documents)
}
