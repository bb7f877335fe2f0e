//! # Semantic Type Resolver
//!
//! Binds a schema's `credentialSubject` to the JSON-LD vocabulary entries
//! that define it, producing the `@type` values used in issued credentials.
//!
//! Two context layouts are in circulation and are tried in order:
//!
//! 1. **Nested type contexts** — `@context` is a one-element array holding
//!    a mapping; each type is an entry with its own `@id` and `@context`.
//! 2. **Flat schema-id context** — `@context` is a mapping with a
//!    `schema-id` base URI, a shared `credentialSubject.@context`, and one
//!    type entry whose value is exactly `{"@id": "schema-id"}`.
//!
//! Each attempt runs in isolation. The first that resolves wins; otherwise
//! the error keeps the coverage diagnostic of a layout that matched
//! structurally, or lists why neither layout matched.

use issuer_core::Uri;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::attribute::Attribute;
use crate::error::SchemaError;

/// Name of the object property holding credential claims.
pub const CREDENTIAL_SUBJECT: &str = "credentialSubject";

const CONTEXT: &str = "@context";
const ID: &str = "@id";
const SCHEMA_ID: &str = "schema-id";

/// A resolved binding between the credential subject and a vocabulary
/// entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JsonLdType {
    /// Vocabulary URI of the type.
    pub id: Uri,
    /// Term under which the context declares the type.
    pub name: String,
}

/// Supported JSON-LD context layouts, in resolution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ContextConvention {
    /// One-element `@context` array of per-type definitions.
    NestedTypes,
    /// Flat `@context` mapping keyed off a `schema-id` base URI.
    SchemaId,
}

/// Outcome of a single convention attempt.
enum Attempt {
    /// The context does not have this convention's shape.
    Shape(String),
    /// Shape matched but no type covers every subject property.
    Coverage(String),
    /// Types resolved.
    Resolved(Vec<JsonLdType>),
}

impl ContextConvention {
    /// All conventions in the order they are attempted.
    fn all() -> &'static [ContextConvention] {
        &[Self::NestedTypes, Self::SchemaId]
    }

    /// Short name for logs and diagnostics.
    fn as_str(&self) -> &'static str {
        match self {
            Self::NestedTypes => "nested-types",
            Self::SchemaId => "schema-id",
        }
    }

    fn attempt(&self, context: &JsonValue, subject: &[&str]) -> Attempt {
        match self {
            Self::NestedTypes => nested_types(context, subject),
            Self::SchemaId => schema_id(context, subject),
        }
    }
}

impl std::fmt::Display for ContextConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve the JSON-LD types describing the credential subject of
/// `attribute` from `context`.
///
/// # Errors
///
/// Returns [`SchemaError::MissingCredentialSubject`] if the schema has no
/// `credentialSubject` object, and [`SchemaError::InvalidContext`] if no
/// convention yields a type covering every subject property.
pub fn resolve_json_ld_types(
    attribute: &Attribute,
    context: &JsonValue,
) -> Result<Vec<JsonLdType>, SchemaError> {
    let subject = credential_subject(attribute)?;
    let names = subject.property_names();

    let mut coverage = None;
    let mut shapes = Vec::new();
    for convention in ContextConvention::all() {
        match convention.attempt(context, &names) {
            Attempt::Resolved(types) => {
                tracing::debug!(
                    convention = %convention,
                    types = types.len(),
                    "resolved JSON-LD types"
                );
                return Ok(types);
            }
            Attempt::Coverage(reason) => {
                if coverage.is_none() {
                    coverage = Some(reason);
                }
            }
            Attempt::Shape(reason) => shapes.push(format!("{convention}: {reason}")),
        }
    }

    let reason = coverage
        .unwrap_or_else(|| format!("context matches no known layout ({})", shapes.join("; ")));
    Err(SchemaError::InvalidContext { reason })
}

/// The single `credentialSubject` object property of a schema root.
///
/// # Errors
///
/// Returns [`SchemaError::MissingCredentialSubject`] if the root is not an
/// object or has no object-typed `credentialSubject` property.
pub fn credential_subject(attribute: &Attribute) -> Result<&Attribute, SchemaError> {
    let properties = attribute
        .properties()
        .ok_or(SchemaError::MissingCredentialSubject)?;
    let mut subjects = properties
        .iter()
        .filter(|p| p.name == CREDENTIAL_SUBJECT && p.is_object());
    match (subjects.next(), subjects.next()) {
        (Some(subject), None) => Ok(subject),
        _ => Err(SchemaError::MissingCredentialSubject),
    }
}

fn nested_types(context: &JsonValue, subject: &[&str]) -> Attempt {
    let definitions = match context.get(CONTEXT) {
        Some(JsonValue::Array(entries)) if entries.len() == 1 => match &entries[0] {
            JsonValue::Object(map) => map,
            _ => return Attempt::Shape("@context entry is not a mapping".into()),
        },
        Some(JsonValue::Array(entries)) => {
            return Attempt::Shape(format!("@context array has {} entries, expected 1", entries.len()))
        }
        _ => return Attempt::Shape("@context is not a one-element array".into()),
    };

    let mut resolved = Vec::new();
    let mut rejected = Vec::new();
    for (name, definition) in definitions {
        let Some((id, terms)) = type_definition(definition) else {
            continue;
        };
        let missing = missing_terms(terms, subject);
        if missing.is_empty() {
            resolved.push(JsonLdType { id, name: name.clone() });
        } else {
            rejected.push(format!("{name} lacks [{}]", missing.join(", ")));
        }
    }

    if !resolved.is_empty() {
        return Attempt::Resolved(resolved);
    }
    if rejected.is_empty() {
        return Attempt::Coverage("context defines no type with both @id and @context".into());
    }
    Attempt::Coverage(format!(
        "no type covers every credentialSubject property: {}",
        rejected.join("; ")
    ))
}

/// `(@id, @context terms)` of an entry that defines a type.
fn type_definition(definition: &JsonValue) -> Option<(Uri, Option<&Map<String, JsonValue>>)> {
    let map = definition.as_object()?;
    let terms = map.get(CONTEXT)?;
    let id = Uri::parse(map.get(ID)?.as_str()?).ok()?;
    Some((id, terms.as_object()))
}

fn schema_id(context: &JsonValue, subject: &[&str]) -> Attempt {
    let Some(outer) = context.get(CONTEXT).and_then(JsonValue::as_object) else {
        return Attempt::Shape("@context is not a mapping".into());
    };
    let Some(terms) = outer
        .get(CREDENTIAL_SUBJECT)
        .and_then(|cs| cs.get(CONTEXT))
        .and_then(JsonValue::as_object)
    else {
        return Attempt::Shape("missing credentialSubject.@context mapping".into());
    };
    let base = match outer.get(SCHEMA_ID).and_then(JsonValue::as_str).map(Uri::parse) {
        Some(Ok(base)) => base,
        Some(Err(e)) => return Attempt::Shape(format!("schema-id is not a uri: {e}")),
        None => return Attempt::Shape("missing schema-id".into()),
    };

    let marker = serde_json::json!({ "@id": "schema-id" });
    let mut keys = outer
        .iter()
        .filter(|(_, value)| **value == marker)
        .map(|(key, _)| key);
    let name = match (keys.next(), keys.next()) {
        (Some(name), None) => name,
        (None, _) => return Attempt::Shape("no entry is bound to schema-id".into()),
        (Some(_), Some(_)) => return Attempt::Shape("more than one entry is bound to schema-id".into()),
    };
    let id = match base.join_suffix(name) {
        Ok(id) => id,
        Err(e) => return Attempt::Shape(e.to_string()),
    };

    let missing = missing_terms(Some(terms), subject);
    if !missing.is_empty() {
        return Attempt::Coverage(format!(
            "credentialSubject context lacks [{}]",
            missing.join(", ")
        ));
    }
    Attempt::Resolved(vec![JsonLdType { id, name: name.clone() }])
}

fn missing_terms<'s>(terms: Option<&Map<String, JsonValue>>, subject: &[&'s str]) -> Vec<&'s str> {
    subject
        .iter()
        .copied()
        .filter(|name| !terms.is_some_and(|t| t.contains_key(*name)))
        .collect()
}
