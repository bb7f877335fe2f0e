//! # Types Subcommand
//!
//! Resolves the JSON-LD types bound to a schema's credential subject from a
//! context document.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde_json::json;

use crate::document::SchemaInput;

/// Arguments for the `issuer types` subcommand.
#[derive(Args, Debug)]
pub struct TypesArgs {
    /// Credential schema document (JSON or YAML).
    #[arg(long, value_name = "FILE")]
    pub schema: PathBuf,

    /// JSON-LD context document.
    #[arg(long, value_name = "FILE")]
    pub context: PathBuf,

    #[command(flatten)]
    pub input: SchemaInput,
}

/// Execute the types subcommand.
pub fn run_types(args: &TypesArgs) -> Result<u8> {
    let schema = match args.input.load_schema(&args.schema)? {
        Ok(schema) => schema,
        Err(err) => return crate::report_rejection(&err),
    };
    let context = args.input.load(&args.context)?;
    crate::finish(schema.json_ld_types(&context).map(|types| json!(types)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../issuer-schema/tests/fixtures")
            .join(name)
    }

    fn input() -> SchemaInput {
        SchemaInput { format: None, max_depth: 32 }
    }

    #[test]
    fn test_types_from_fixture_files() {
        let schema = input()
            .load_schema(&fixture("kyc-age-v3.schema.json"))
            .unwrap()
            .unwrap();
        let context = input().load(&fixture("kyc-v3.nested.jsonld")).unwrap();
        let types = schema.json_ld_types(&context).unwrap();
        assert_eq!(
            json!(types),
            json!([{
                "id": "https://example.org/schemas/json-ld/kyc-v3.json-ld#KYCAgeCredential",
                "name": "KYCAgeCredential"
            }])
        );
    }

    #[test]
    fn test_run_types_reports_rejection() {
        let args = TypesArgs {
            schema: fixture("membership.schema.yaml"),
            context: fixture("kyc-v3.nested.jsonld"),
            input: input(),
        };
        assert_eq!(run_types(&args).unwrap(), 1);
    }

    #[test]
    fn test_run_types_missing_file() {
        let args = TypesArgs {
            schema: fixture("missing.schema.json"),
            context: fixture("kyc-v3.nested.jsonld"),
            input: input(),
        };
        assert!(run_types(&args).is_err());
    }
}
