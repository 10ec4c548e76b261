//! Save codec error types

use std::path::PathBuf;

use crate::property::PropertyKind;

/// Broad failure category, used by callers that only need to decide how to
/// report an error (bad file, wrong title, bad edit, filesystem).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The byte stream does not follow the tag grammar; the cursor is lost.
    StructuralDecode,
    /// An array-typed name has no registry entry (title/version mismatch).
    SchemaLookup,
    /// A JSON value does not fit the type implied by its key or shape.
    ValueFormat,
    /// A file could not be read or written.
    Resource,
}

/// Errors produced while reading, writing or bridging save data.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// A fixed-width or length-prefixed read ran past the end of the buffer
    #[error("unexpected end of data at offset {offset} (wanted {wanted} bytes)")]
    UnexpectedEof { offset: usize, wanted: usize },

    /// A length-prefixed string could not be decoded
    #[error("invalid string at offset {offset}: {reason}")]
    InvalidString { offset: usize, reason: String },

    /// A tag declared a type string outside the known property kinds
    #[error("property '{name}' at offset {offset} has unknown type '{type_name}'")]
    UnknownPropertyType {
        name: String,
        type_name: String,
        offset: usize,
    },

    /// A dynamic array declared a negative entry count
    #[error("array '{name}' at offset {offset} declares invalid entry count {count}")]
    InvalidEntryCount {
        name: String,
        count: i32,
        offset: usize,
    },

    /// An array element kind that the tag grammar cannot express
    #[error("array '{name}' cannot hold {element:?} elements")]
    UnsupportedArrayElement { name: String, element: PropertyKind },

    /// A run of same-named tags did not end
    #[error("static array '{name}' exceeds {limit} elements at offset {offset}")]
    StaticArrayOverflow {
        name: String,
        limit: usize,
        offset: usize,
    },

    /// Structs nested deeper than the decoder allows
    #[error("property '{name}' at offset {offset} is nested more than {limit} levels deep")]
    NestingTooDeep {
        name: String,
        limit: usize,
        offset: usize,
    },

    /// An array-typed property has no registry entry for the active title
    #[error("no array metadata registered for '{name}' (wrong title or game version?)")]
    MissingArrayMetadata { name: String },

    /// A JSON value does not match the kind implied by its key or shape
    #[error("property '{property}': expected {expected}, found {found}")]
    ValueFormat {
        property: String,
        expected: &'static str,
        found: String,
    },

    /// A tree cannot be represented in JSON without changing meaning
    #[error("property '{key}' cannot be written to JSON unambiguously: {reason}")]
    AmbiguousKey { key: String, reason: &'static str },

    /// A keyed static-array entry names no known index
    #[error("'{key}' is not a valid index name for array '{array}'")]
    UnknownIndexName { array: String, key: String },

    /// A computed length or count does not fit the 32-bit field
    #[error("property '{name}' is too large to encode")]
    SizeOverflow { name: String },

    /// A string is too long for its 32-bit length prefix
    #[error("string of {len} bytes is too long to encode")]
    StringTooLong { len: usize },

    /// The file is shorter than the fixed save header
    #[error("save header needs {expected} bytes, file has {actual}")]
    InvalidHeader { expected: usize, actual: usize },

    /// The payload is encrypted and no cipher was supplied
    #[error("save payload is encrypted (version 0x{version:08X}, magic 0x{magic:08X})")]
    EncryptedPayload { version: u32, magic: u32 },

    /// The header does not identify a supported title
    #[error("cannot determine title from header (version 0x{version:08X}, magic 0x{magic:08X})")]
    UnknownTitle { version: u32, magic: u32 },

    /// A block cipher collaborator failed
    #[error("payload cipher failed: {0}")]
    Cipher(String),

    /// The JSON text itself is malformed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A file could not be read or written
    #[error("{action} '{path}': {source}")]
    Resource {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file is larger than the configured read limit
    #[error("file too large: '{path}' ({len} bytes, max {max} bytes)")]
    FileTooLarge { path: PathBuf, len: u64, max: u64 },
}

impl SaveError {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SaveError::UnexpectedEof { .. }
            | SaveError::InvalidString { .. }
            | SaveError::UnknownPropertyType { .. }
            | SaveError::InvalidEntryCount { .. }
            | SaveError::UnsupportedArrayElement { .. }
            | SaveError::StaticArrayOverflow { .. }
            | SaveError::NestingTooDeep { .. }
            | SaveError::SizeOverflow { .. }
            | SaveError::StringTooLong { .. }
            | SaveError::InvalidHeader { .. }
            | SaveError::EncryptedPayload { .. }
            | SaveError::UnknownTitle { .. }
            | SaveError::Cipher(_) => ErrorKind::StructuralDecode,
            SaveError::MissingArrayMetadata { .. } => ErrorKind::SchemaLookup,
            SaveError::ValueFormat { .. }
            | SaveError::AmbiguousKey { .. }
            | SaveError::UnknownIndexName { .. }
            | SaveError::Json(_) => ErrorKind::ValueFormat,
            SaveError::Resource { .. } | SaveError::FileTooLarge { .. } => ErrorKind::Resource,
        }
    }

    pub(crate) fn value_format(
        property: impl Into<String>,
        expected: &'static str,
        found: &serde_json::Value,
    ) -> Self {
        SaveError::ValueFormat {
            property: property.into(),
            expected,
            found: describe_json(found),
        }
    }
}

/// Short description of a JSON value for error messages
fn describe_json(value: &serde_json::Value) -> String {
    use serde_json::Value;
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) => format!("string {s:?}"),
        Value::Array(a) => format!("array of {} values", a.len()),
        Value::Object(o) => format!("object with {} members", o.len()),
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, SaveError>;
