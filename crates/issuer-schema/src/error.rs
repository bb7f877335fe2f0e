//! # Schema Engine Errors
//!
//! Every failure raised by parsing, value validation, or JSON-LD resolution.
//! Variants carry structured context (path, expected vs found) and map onto
//! the client-facing [`ErrorKind`] taxonomy via [`SchemaError::kind`].

use issuer_core::{ErrorKind, FieldPath, JsonType};
use serde_json::Value as JsonValue;
use thiserror::Error;

/// Error raised by the credential schema engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// The schema document violates the structural grammar.
    #[error("invalid schema at {path}: {reason} (expected {})", type_list(.expected))]
    InvalidSchema {
        /// Location of the offending node in the schema document.
        path: FieldPath,
        /// JSON types acceptable at that location.
        expected: Vec<JsonType>,
        /// What was wrong.
        reason: String,
    },

    /// A required attribute's value is absent.
    #[error("missing required attribute at {path}")]
    MissingRequired {
        /// Location of the absent value.
        path: FieldPath,
    },

    /// A value's runtime shape does not match its attribute's type.
    #[error("type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        /// Location of the value.
        path: FieldPath,
        /// Declared type.
        expected: JsonType,
        /// Runtime type of the supplied value.
        found: JsonType,
    },

    /// A scalar value is outside the attribute's enumerated set.
    #[error("value {value} at {path} is not one of {}", value_list(.allowed))]
    EnumViolation {
        /// Location of the value.
        path: FieldPath,
        /// The rejected value.
        value: JsonValue,
        /// The declared enumeration.
        allowed: Vec<JsonValue>,
    },

    /// An object value has a key with no declared property.
    #[error("unknown attribute '{key}' at {path}")]
    UnknownAttribute {
        /// Location of the object holding the key.
        path: FieldPath,
        /// The undeclared key.
        key: String,
    },

    /// No candidate schema of a union attribute accepted the value.
    #[error("value at {path} matches none of the declared types {}", type_list(.candidates))]
    NoMatchingType {
        /// Location of the value.
        path: FieldPath,
        /// Candidate types in declaration order.
        candidates: Vec<JsonType>,
    },

    /// The schema has no `credentialSubject` object property.
    #[error("schema does not declare a credentialSubject object")]
    MissingCredentialSubject,

    /// The JSON-LD context could not be matched against the schema.
    #[error("invalid JSON-LD context: {reason}")]
    InvalidContext {
        /// Most specific diagnostic available.
        reason: String,
    },
}

impl SchemaError {
    /// Client-facing category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSchema { .. } => ErrorKind::InvalidSchema,
            Self::MissingRequired { .. } => ErrorKind::MissingRequired,
            Self::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Self::EnumViolation { .. } => ErrorKind::EnumViolation,
            Self::UnknownAttribute { .. } => ErrorKind::UnknownAttribute,
            Self::NoMatchingType { .. } => ErrorKind::NoMatchingType,
            Self::MissingCredentialSubject => ErrorKind::MissingCredentialSubject,
            Self::InvalidContext { .. } => ErrorKind::InvalidContext,
        }
    }

    /// Location of the failure, for variants tied to a document node.
    pub fn path(&self) -> Option<&FieldPath> {
        match self {
            Self::InvalidSchema { path, .. }
            | Self::MissingRequired { path }
            | Self::TypeMismatch { path, .. }
            | Self::EnumViolation { path, .. }
            | Self::UnknownAttribute { path, .. }
            | Self::NoMatchingType { path, .. } => Some(path),
            Self::MissingCredentialSubject | Self::InvalidContext { .. } => None,
        }
    }

    pub(crate) fn invalid(path: &FieldPath, expected: &[JsonType], reason: impl Into<String>) -> Self {
        Self::InvalidSchema {
            path: path.clone(),
            expected: expected.to_vec(),
            reason: reason.into(),
        }
    }
}

fn type_list(types: &[JsonType]) -> String {
    let names: Vec<&str> = types.iter().map(JsonType::as_str).collect();
    format!("[{}]", names.join(", "))
}

fn value_list(values: &[JsonValue]) -> String {
    let rendered: Vec<String> = values.iter().map(JsonValue::to_string).collect();
    format!("[{}]", rendered.join(", "))
}
