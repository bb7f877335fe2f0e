//! # issuer-core — Foundational Types for the Credential Issuer
//!
//! Leaf crate of the issuer workspace. It defines the vocabulary shared by
//! the schema engine and everything that surfaces its results:
//!
//! 1. **`JsonType`** — the seven JSON type tokens a credential schema may
//!    declare. One definition, exhaustive `match` everywhere.
//!
//! 2. **`FieldPath`** — the location of a node inside a schema or value
//!    document. Every structured error carries one.
//!
//! 3. **`Uri`** — validated absolute URI used for JSON-LD `@id` bindings.
//!    No bare strings for semantic identifiers.
//!
//! 4. **`ErrorKind`** — the closed error taxonomy reported to clients by the
//!    issuance and schema-import layers.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `issuer-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod json_type;
pub mod path;

pub use error::{ErrorKind, UriError};
pub use identity::Uri;
pub use json_type::{JsonType, JSON_TYPE_COUNT};
pub use path::{FieldPath, PathSegment};
