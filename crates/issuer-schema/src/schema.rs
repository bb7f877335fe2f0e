//! # Credential Schema
//!
//! Top-level view of an imported credential schema: the parsed root
//! attribute plus the `$metadata` block that points at its JSON-LD
//! context. Built once per schema import and cached by the caller; every
//! issuance validates against the cached instance.

use issuer_core::{FieldPath, JsonType};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::attribute::Attribute;
use crate::config::ParserConfig;
use crate::error::SchemaError;
use crate::jsonld::{self, JsonLdType, CREDENTIAL_SUBJECT};
use crate::parser::SchemaParser;
use crate::validate;
use crate::value::Value;

/// `$metadata` of a credential schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaMetadata {
    /// `$metadata.uris.jsonLdContext`: where the JSON-LD context lives.
    pub json_ld_context: String,
    /// `$metadata.type`: the credential type name, if declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    /// `$metadata.version`, if declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// A parsed credential schema.
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialSchema {
    attribute: Attribute,
    metadata: SchemaMetadata,
}

impl CredentialSchema {
    /// Parse a credential schema document with default limits.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidSchema`] if `$metadata.uris.jsonLdContext`
    /// is missing, the root is not an object schema, or any node is invalid.
    pub fn parse(document: &JsonValue) -> Result<Self, SchemaError> {
        Self::parse_with(document, &SchemaParser::default())
    }

    /// Parse a credential schema document with the given parser.
    ///
    /// # Errors
    ///
    /// See [`CredentialSchema::parse`].
    pub fn parse_with(document: &JsonValue, parser: &SchemaParser) -> Result<Self, SchemaError> {
        let metadata = parse_metadata(document)?;
        let attribute = parser.parse_attribute(document, "", true)?;
        if !attribute.is_object() {
            return Err(SchemaError::invalid(
                &FieldPath::root().key("type"),
                &[JsonType::Object],
                "credential schema root must be an object",
            ));
        }
        tracing::debug!(
            schema_type = metadata.schema_type.as_deref().unwrap_or(""),
            properties = attribute.property_names().len(),
            "parsed credential schema"
        );
        Ok(Self { attribute, metadata })
    }

    /// Parse with a custom [`ParserConfig`].
    ///
    /// # Errors
    ///
    /// See [`CredentialSchema::parse`].
    pub fn parse_with_config(document: &JsonValue, config: ParserConfig) -> Result<Self, SchemaError> {
        Self::parse_with(document, &SchemaParser::new(config))
    }

    /// The root attribute.
    pub fn attribute(&self) -> &Attribute {
        &self.attribute
    }

    /// The `$metadata` block.
    pub fn metadata(&self) -> &SchemaMetadata {
        &self.metadata
    }

    /// The `credentialSubject` attribute.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingCredentialSubject`] if not declared.
    pub fn credential_subject(&self) -> Result<&Attribute, SchemaError> {
        jsonld::credential_subject(&self.attribute)
    }

    /// Validate a full credential document.
    ///
    /// # Errors
    ///
    /// See [`validate::parse_value`].
    pub fn validate<'a>(&'a self, document: &JsonValue) -> Result<Value<'a>, SchemaError> {
        validate::parse_value(&self.attribute, Some(document))
    }

    /// Validate just the claims of a credential against `credentialSubject`.
    ///
    /// Error paths are reported under `credentialSubject`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingCredentialSubject`] if the schema has
    /// none, otherwise see [`validate::parse_value`].
    pub fn validate_credential_subject<'a>(
        &'a self,
        subject: &JsonValue,
    ) -> Result<Value<'a>, SchemaError> {
        let attribute = self.credential_subject()?;
        validate::validate_at(
            attribute,
            Some(subject),
            &FieldPath::root().key(CREDENTIAL_SUBJECT),
        )
    }

    /// Resolve the JSON-LD types of this schema's credential subject.
    ///
    /// # Errors
    ///
    /// See [`jsonld::resolve_json_ld_types`].
    pub fn json_ld_types(&self, context: &JsonValue) -> Result<Vec<JsonLdType>, SchemaError> {
        jsonld::resolve_json_ld_types(&self.attribute, context)
    }
}

fn parse_metadata(document: &JsonValue) -> Result<SchemaMetadata, SchemaError> {
    let path = FieldPath::root().key("$metadata");
    let metadata = document.get("$metadata").ok_or_else(|| {
        SchemaError::invalid(&path, &[JsonType::Object], "missing $metadata")
    })?;
    let context_path = path.key("uris").key("jsonLdContext");
    let json_ld_context = metadata
        .get("uris")
        .and_then(|uris| uris.get("jsonLdContext"))
        .and_then(JsonValue::as_str)
        .ok_or_else(|| {
            SchemaError::invalid(
                &context_path,
                &[JsonType::String],
                "missing $metadata.uris.jsonLdContext",
            )
        })?;

    let optional = |key: &str| -> Result<Option<String>, SchemaError> {
        match metadata.get(key) {
            None => Ok(None),
            Some(JsonValue::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(SchemaError::invalid(
                &path.key(key),
                &[JsonType::String],
                format!("$metadata.{key} must be a string, found {}", JsonType::of(other)),
            )),
        }
    };

    Ok(SchemaMetadata {
        json_ld_context: json_ld_context.to_string(),
        schema_type: optional("type")?,
        version: optional("version")?,
    })
}
