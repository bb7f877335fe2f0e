//! # issuer-schema — Credential Schema Engine
//!
//! Turns declarative credential schemas into typed attribute trees,
//! validates candidate credential values against them, and resolves the
//! JSON-LD types that bind a schema's credential subject to vocabulary URIs.
//!
//! ## Components
//!
//! - [`parser`] — schema document → [`Attribute`] tree. Eight closed
//!   variants, union types for `type` arrays, object properties ordered
//!   leaves-first.
//! - [`validate`] — value document + attribute tree → [`Value`] tree, or the
//!   first structured mismatch.
//! - [`jsonld`] — attribute tree + JSON-LD context → [`JsonLdType`]
//!   bindings, trying the nested-types layout before the schema-id layout.
//! - [`schema`] — [`CredentialSchema`], the cached per-schema facade tying
//!   the three together with the `$metadata` block.
//!
//! ## Security Invariant
//!
//! Validation is the gate in front of signing: a credential that fails here
//! must never be issued. Every check is fail-fast and deterministic, and
//! every error carries the document path of the offending node.
//!
//! ## Crate Policy
//!
//! - Depends only on `issuer-core` internally.
//! - Pure computation: no I/O, no shared mutable state. All public entry
//!   points are safe to call from concurrent request handlers.

pub mod attribute;
pub mod config;
pub mod error;
pub mod jsonld;
pub mod parser;
pub mod schema;
pub mod validate;
pub mod value;

pub use attribute::{
    order_properties, ArraySchema, Attribute, AttributeKind, BooleanSchema, Descriptor,
    MultiSchema, NumericSchema, ObjectSchema, StringSchema,
};
pub use config::ParserConfig;
pub use error::SchemaError;
pub use jsonld::{credential_subject, resolve_json_ld_types, JsonLdType};
pub use parser::{parse_attribute, SchemaParser};
pub use schema::{CredentialSchema, SchemaMetadata};
pub use validate::{parse_value, validate_at};
pub use value::{Elements, Properties, Value, ValueData};
