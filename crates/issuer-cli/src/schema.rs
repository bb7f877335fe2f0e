//! # Schema Subcommand
//!
//! Parses a credential schema and prints its metadata, the property order
//! the engine will use, and the normalized schema document. With `--field`,
//! prints the definition of one field instead.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use serde_json::{json, Value as JsonValue};

use issuer_core::FieldPath;
use issuer_schema::CredentialSchema;

use crate::document::SchemaInput;

/// Arguments for the `issuer schema` subcommand.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Credential schema document (JSON or YAML).
    #[arg(value_name = "FILE")]
    pub path: PathBuf,

    /// Print only this field, as a dotted path (`credentialSubject.birthday`).
    #[arg(long, value_name = "PATH")]
    pub field: Option<String>,

    #[command(flatten)]
    pub input: SchemaInput,
}

/// Execute the schema subcommand.
pub fn run_schema(args: &SchemaArgs) -> Result<u8> {
    let schema = match args.input.load_schema(&args.path)? {
        Ok(schema) => schema,
        Err(err) => return crate::report_rejection(&err),
    };
    let summary = match &args.field {
        Some(field) => describe_field(&schema, field)?,
        None => describe(&schema),
    };
    crate::print_json(&summary)?;
    Ok(0)
}

/// Definition of a single field, addressed by dotted path.
pub fn describe_field(schema: &CredentialSchema, field: &str) -> Result<JsonValue> {
    let path = FieldPath::from_dotted(field);
    let Some(attribute) = schema.attribute().find(&path) else {
        bail!("schema declares no field {field:?}");
    };
    Ok(json!({
        "path": path,
        "required": attribute.required,
        "types": attribute.declared_types(),
        "schema": attribute.to_document(),
    }))
}

/// Summary of a parsed schema.
pub fn describe(schema: &CredentialSchema) -> JsonValue {
    let subject = schema
        .credential_subject()
        .ok()
        .map(|subject| subject.property_names());
    json!({
        "metadata": schema.metadata(),
        "propertyOrder": schema.attribute().property_names(),
        "credentialSubjectOrder": subject,
        "schema": schema.attribute().to_document(),
    })
}
