//! # Input Documents
//!
//! Loads schema, credential, and context documents from disk. The format is
//! taken from the file extension (`.yaml`/`.yml` for YAML, anything else
//! as JSON) unless `--format` overrides it. YAML is decoded straight into
//! `serde_json::Value`, keeping mapping order.

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde_json::Value as JsonValue;

use issuer_schema::{CredentialSchema, ParserConfig};

/// Encoding of an input document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Detect the format from a path's extension.
    pub fn detect(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// Schema input shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct SchemaInput {
    /// Force the input format instead of detecting it from the extension.
    #[arg(long, value_enum)]
    pub format: Option<DocumentFormat>,

    /// Maximum schema nesting depth accepted by the parser.
    #[arg(long, default_value_t = issuer_schema::config::DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,
}

impl SchemaInput {
    /// Load a document honoring the `--format` override.
    pub fn load(&self, path: &Path) -> Result<JsonValue> {
        load_document(path, self.format)
    }

    /// Parser configuration derived from the flags.
    pub fn config(&self) -> ParserConfig {
        ParserConfig::with_max_depth(self.max_depth)
    }

    /// Load and parse a credential schema.
    ///
    /// The outer error is operational (unreadable file, bad syntax); the
    /// inner one is the engine rejecting the schema.
    pub fn load_schema(
        &self,
        path: &Path,
    ) -> Result<std::result::Result<CredentialSchema, issuer_schema::SchemaError>> {
        let document = self.load(path)?;
        let parsed = CredentialSchema::parse_with_config(&document, self.config());
        if let Ok(schema) = &parsed {
            tracing::info!(
                path = %path.display(),
                schema_type = schema.metadata().schema_type.as_deref().unwrap_or(""),
                "loaded credential schema"
            );
        }
        Ok(parsed)
    }
}

/// Read and decode a document from disk.
pub fn load_document(path: &Path, format: Option<DocumentFormat>) -> Result<JsonValue> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let format = format.unwrap_or_else(|| DocumentFormat::detect(path));
    tracing::debug!(path = %path.display(), ?format, "loading document");
    parse_document(&content, format).with_context(|| format!("cannot decode {}", path.display()))
}

/// Decode document text in the given format.
pub fn parse_document(content: &str, format: DocumentFormat) -> Result<JsonValue> {
    match format {
        DocumentFormat::Json => serde_json::from_str(content).context("invalid JSON"),
        DocumentFormat::Yaml => serde_yaml::from_str(content).context("invalid YAML"),
    }
}
