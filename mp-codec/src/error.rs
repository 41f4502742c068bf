use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Failure while decoding a document into a definition.
///
/// Carries the document id so log lines point at the offending file; the
/// message includes the failing field and position where serde knows it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("failed to decode '{id}': {message}")]
pub struct DecodeError {
    pub id: String,
    pub message: String,
}

impl DecodeError {
    pub fn new(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
        }
    }

    pub(crate) fn from_json(id: &str, err: &serde_json::Error) -> Self {
        Self::new(id, err.to_string())
    }

    pub(crate) fn field(id: &str, field: &str, err: impl fmt::Display) -> Self {
        Self::new(id, format!("field '{field}': {err}"))
    }
}

/// Failure while encoding a definition back to a document.
///
/// Not expected during normal operation; encountering one means the
/// definition itself is in an inconsistent state.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure while writing definitions out to disk.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("export folder must be a directory but was a file instead: {0}")]
    NotADirectory(PathBuf),
}
