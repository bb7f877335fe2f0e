//! # Validate Subcommand
//!
//! Validates a credential document, or just its subject claims, against a
//! credential schema and prints the projected value.
//!
//! ## Security Invariant
//!
//! This runs the same checks an issuer applies before signing. A document
//! accepted here is exactly what the issuer would accept for the schema.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde_json::Value as JsonValue;

use issuer_schema::{CredentialSchema, SchemaError};

use crate::document::SchemaInput;

/// Arguments for the `issuer validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Credential schema document (JSON or YAML).
    #[arg(long, value_name = "FILE")]
    pub schema: PathBuf,

    /// Document to validate (JSON or YAML).
    #[arg(long, value_name = "FILE")]
    pub value: PathBuf,

    /// Treat the value as the credential subject only.
    #[arg(long)]
    pub subject_only: bool,

    #[command(flatten)]
    pub input: SchemaInput,
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let schema = match args.input.load_schema(&args.schema)? {
        Ok(schema) => schema,
        Err(err) => return crate::report_rejection(&err),
    };
    let document = args.input.load(&args.value)?;
    crate::finish(validate_document(&schema, &document, args.subject_only))
}

/// Validate and project a document.
pub fn validate_document(
    schema: &CredentialSchema,
    document: &JsonValue,
    subject_only: bool,
) -> Result<JsonValue, SchemaError> {
    let value = if subject_only {
        schema.validate_credential_subject(document)?
    } else {
        schema.validate(document)?
    };
    Ok(value.to_json().unwrap_or(JsonValue::Null))
}

#[cfg(test)]
mod tests {
    use super::*;
    use issuer_core::ErrorKind;
    use serde_json::json;

    fn schema() -> CredentialSchema {
        CredentialSchema::parse(&json!({
            "$metadata": { "uris": { "jsonLdContext": "https://example/ctx" } },
            "type": "object",
            "properties": {
                "credentialSubject": {
                    "type": "object",
                    "properties": {
                        "age": { "type": "integer" },
                        "nickname": { "type": "string" }
                    },
                    "required": ["age"]
                }
            },
            "required": ["credentialSubject"]
        }))
        .unwrap()
    }

    #[test]
    fn test_validate_full_document() {
        let doc = json!({ "credentialSubject": { "age": 30, "nickname": null } });
        assert_eq!(
            validate_document(&schema(), &doc, false).unwrap(),
            json!({ "credentialSubject": { "age": 30 } })
        );
    }

    #[test]
    fn test_validate_subject_only() {
        let err = validate_document(&schema(), &json!({ "age": "thirty" }), true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.path().unwrap().to_string(), "credentialSubject.age");
    }

    #[test]
    fn test_subject_document_rejected_as_credential() {
        let err = validate_document(&schema(), &json!({ "age": 30 }), false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownAttribute);
    }
}
