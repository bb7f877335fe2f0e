//! # Error Taxonomy
//!
//! Defines the error kinds surfaced by the schema engine. Domain crates keep
//! their own `thiserror` enums with structured context; every one of those
//! variants maps onto exactly one [`ErrorKind`] so that the HTTP layer can
//! report a stable, machine-readable category.
//!
//! ## Design
//!
//! - Schema-shape problems (bad type tags, malformed metadata, unusable
//!   JSON-LD contexts) are client errors against the schema import: 400.
//! - Value problems (missing, mistyped, out-of-enum, unknown keys) are
//!   semantic errors against an otherwise well-formed request: 422.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed error taxonomy of the credential schema engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The schema document violates the structural grammar.
    InvalidSchema,
    /// A required attribute's value is absent.
    MissingRequired,
    /// A value's runtime shape does not match its declared type.
    TypeMismatch,
    /// A scalar value is not a member of the declared enumerated set.
    EnumViolation,
    /// An object value contains a key with no declared property.
    UnknownAttribute,
    /// None of a union attribute's candidate schemas accepted the value.
    NoMatchingType,
    /// The schema has no `credentialSubject` object property.
    MissingCredentialSubject,
    /// The JSON-LD context cannot be matched against the schema.
    InvalidContext,
}

impl ErrorKind {
    /// Returns every error kind in declaration order.
    pub fn all() -> &'static [ErrorKind] {
        &[
            Self::InvalidSchema,
            Self::MissingRequired,
            Self::TypeMismatch,
            Self::EnumViolation,
            Self::UnknownAttribute,
            Self::NoMatchingType,
            Self::MissingCredentialSubject,
            Self::InvalidContext,
        ]
    }

    /// Stable identifier used in logs and client responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidSchema => "InvalidSchema",
            Self::MissingRequired => "MissingRequired",
            Self::TypeMismatch => "TypeMismatch",
            Self::EnumViolation => "EnumViolation",
            Self::UnknownAttribute => "UnknownAttribute",
            Self::NoMatchingType => "NoMatchingType",
            Self::MissingCredentialSubject => "MissingCredentialSubject",
            Self::InvalidContext => "InvalidContext",
        }
    }

    /// HTTP status the issuance layer reports for this kind.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidSchema | Self::MissingCredentialSubject | Self::InvalidContext => 400,
            Self::MissingRequired
            | Self::TypeMismatch
            | Self::EnumViolation
            | Self::UnknownAttribute
            | Self::NoMatchingType => 422,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error constructing a validated [`crate::Uri`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UriError {
    /// The input was empty or whitespace.
    #[error("uri must not be empty")]
    Empty,

    /// The input is not an absolute URI.
    #[error("invalid uri '{value}': {reason}")]
    Invalid {
        /// The rejected input.
        value: String,
        /// Parser diagnostic.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_kinds_unique() {
        let mut seen = std::collections::HashSet::new();
        for kind in ErrorKind::all() {
            assert!(seen.insert(kind), "Duplicate kind: {kind}");
        }
        assert_eq!(seen.len(), 8);
    }

    #[test]
    fn test_serde_format_matches_as_str() {
        for kind in ErrorKind::all() {
            let json = serde_json::to_string(kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            let parsed: ErrorKind = serde_json::from_str(&json).unwrap();
            assert_eq!(*kind, parsed);
        }
    }

    #[test]
    fn test_http_status_split() {
        assert_eq!(ErrorKind::InvalidSchema.http_status(), 400);
        assert_eq!(ErrorKind::InvalidContext.http_status(), 400);
        assert_eq!(ErrorKind::MissingCredentialSubject.http_status(), 400);
        assert_eq!(ErrorKind::UnknownAttribute.http_status(), 422);
    }

    #[test]
    fn test_uri_error_display() {
        let err = UriError::Invalid {
            value: "example".to_string(),
            reason: "relative URL without a base".to_string(),
        };
        assert!(err.to_string().contains("example"));
        assert_eq!(UriError::Empty.to_string(), "uri must not be empty");
    }
}
