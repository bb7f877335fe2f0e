//! # issuer-cli — Credential Schema Operator CLI
//!
//! Provides the `issuer` command-line interface over the schema engine, for
//! checking schemas and credential documents before they are imported into
//! a running issuer.
//!
//! ## Subcommands
//!
//! - `issuer schema` — Parse a credential schema, print its normalized form
//!   or a single field's definition.
//! - `issuer validate` — Validate a credential (or just its subject).
//! - `issuer types` — Resolve the JSON-LD types of a schema's subject.
//!
//! ```bash
//! issuer schema kyc-v3.schema.json
//! issuer schema kyc-v3.schema.json --field credentialSubject.birthday
//! issuer validate --schema kyc-v3.schema.json --value credential.json
//! issuer validate --schema kyc-v3.schema.yaml --value subject.yaml --subject-only
//! issuer types --schema kyc-v3.schema.json --context kyc-v3.jsonld
//! ```
//!
//! ## Exit Codes
//!
//! `0` on success, `1` when the engine rejects the input (the structured
//! error is printed as JSON on stdout), `2` on operational errors such as
//! unreadable files.
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from business logic.
//! - Handlers delegate to `issuer-schema`; no schema rules live here.

pub mod document;
pub mod schema;
pub mod types;
pub mod validate;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value as JsonValue;

use issuer_core::ErrorKind;
use issuer_schema::SchemaError;

/// Machine-readable rendering of a rejected input.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// JSON Pointer to the offending node, for tooling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pointer: Option<String>,
    pub message: String,
}

impl From<&SchemaError> for ErrorReport {
    fn from(err: &SchemaError) -> Self {
        let kind = err.kind();
        Self {
            kind,
            status: kind.http_status(),
            path: err.path().map(ToString::to_string),
            pointer: err.path().map(|p| p.to_pointer()),
            message: err.to_string(),
        }
    }
}

/// Print a JSON document to stdout, pretty-printed.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render output")?;
    println!("{rendered}");
    Ok(())
}

/// Print the report for a rejected input and return the rejection exit code.
pub fn report_rejection(err: &SchemaError) -> Result<u8> {
    tracing::info!(kind = %err.kind(), "input rejected");
    print_json(&ErrorReport::from(err))?;
    Ok(1)
}

/// Render a handler outcome: the payload on success, the report otherwise.
pub fn finish(outcome: std::result::Result<JsonValue, SchemaError>) -> Result<u8> {
    match outcome {
        Ok(payload) => {
            print_json(&payload)?;
            Ok(0)
        }
        Err(err) => report_rejection(&err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use issuer_core::FieldPath;
    use serde_json::json;

    #[test]
    fn test_error_report_from_value_error() {
        let err = SchemaError::MissingRequired {
            path: FieldPath::root().key("credentialSubject").key("birthday"),
        };
        let report = ErrorReport::from(&err);
        assert_eq!(report.kind, ErrorKind::MissingRequired);
        assert_eq!(report.status, 422);
        assert_eq!(report.path.as_deref(), Some("credentialSubject.birthday"));
        assert_eq!(report.pointer.as_deref(), Some("/credentialSubject/birthday"));

        let rendered = serde_json::to_value(&report).unwrap();
        assert_eq!(rendered["kind"], json!("MissingRequired"));
    }

    #[test]
    fn test_error_report_without_path() {
        let report = ErrorReport::from(&SchemaError::MissingCredentialSubject);
        assert_eq!(report.status, 400);
        assert!(report.path.is_none());
        let rendered = serde_json::to_value(&report).unwrap();
        assert!(rendered.get("path").is_none());
        assert!(rendered.get("pointer").is_none());
    }

    #[test]
    fn test_finish_exit_codes() {
        assert_eq!(finish(Ok(json!({}))).unwrap(), 0);
        assert_eq!(finish(Err(SchemaError::MissingCredentialSubject)).unwrap(), 1);
    }
}
