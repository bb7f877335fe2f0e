//! # Schema Model Parser
//!
//! Turns an untyped schema document into an [`Attribute`] tree.
//!
//! Dispatch is on the node's `type` keyword:
//!
//! - a single token routes to the matching primitive or composite branch;
//! - an array of two or more distinct tokens produces a `Multi` attribute,
//!   re-parsing the same node once per token, in declaration order;
//! - anything else (missing, empty, duplicate, unknown, single-element
//!   array) is rejected.
//!
//! The first invalid node aborts the parse. Errors carry the path of the
//! offending keyword within the schema document and the JSON types that
//! would have been accepted there.

use std::collections::HashSet;

use issuer_core::{FieldPath, JsonType};
use serde_json::{Map, Number, Value as JsonValue};

use crate::attribute::{
    order_properties, ArraySchema, Attribute, AttributeKind, BooleanSchema, Descriptor,
    MultiSchema, NumericSchema, ObjectSchema, StringSchema,
};
use crate::config::ParserConfig;
use crate::error::SchemaError;
use crate::validate::is_integral;

type Node = Map<String, JsonValue>;

/// Parse `document` as an attribute named `name`, with default limits.
///
/// # Errors
///
/// Returns [`SchemaError::InvalidSchema`] for the first structurally
/// invalid node.
pub fn parse_attribute(
    document: &JsonValue,
    name: &str,
    required: bool,
) -> Result<Attribute, SchemaError> {
    SchemaParser::default().parse_attribute(document, name, required)
}

/// Schema parser with configurable limits.
#[derive(Debug, Clone, Default)]
pub struct SchemaParser {
    config: ParserConfig,
}

/// Result of reading a node's `type` keyword.
enum Declared {
    Single(JsonType),
    Union(Vec<JsonType>),
}

impl SchemaParser {
    /// Create a parser with the given limits.
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    /// The limits this parser enforces.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse `document` as an attribute named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidSchema`] for the first structurally
    /// invalid node, including nodes nested deeper than
    /// [`ParserConfig::max_depth`].
    pub fn parse_attribute(
        &self,
        document: &JsonValue,
        name: &str,
        required: bool,
    ) -> Result<Attribute, SchemaError> {
        self.parse_node(document, name, required, &FieldPath::root(), 0)
    }

    fn parse_node(
        &self,
        document: &JsonValue,
        name: &str,
        required: bool,
        path: &FieldPath,
        depth: usize,
    ) -> Result<Attribute, SchemaError> {
        if depth > self.config.max_depth {
            return Err(SchemaError::invalid(
                path,
                &[JsonType::Object],
                format!("schema nesting exceeds maximum depth of {}", self.config.max_depth),
            ));
        }
        let node = document.as_object().ok_or_else(|| {
            SchemaError::invalid(
                path,
                &[JsonType::Object],
                format!("schema node must be an object, found {}", JsonType::of(document)),
            )
        })?;
        let descriptor = parse_descriptor(node, path)?;

        let kind = match declared_type(node, path)? {
            Declared::Single(ty) => self.parse_kind(ty, node, required, path, depth, false)?,
            Declared::Union(types) => {
                let mut candidates = Vec::with_capacity(types.len());
                for &ty in &types {
                    candidates.push(Attribute {
                        name: name.to_string(),
                        required,
                        descriptor: descriptor.clone(),
                        kind: self.parse_kind(ty, node, required, path, depth, true)?,
                    });
                }
                if types.iter().all(|t| t.supports_enum())
                    && candidates.iter().all(|c| excluded_by_enum(&c.kind))
                {
                    let names: Vec<&str> = types.iter().map(|t| t.as_str()).collect();
                    return Err(SchemaError::invalid(
                        &path.key("enum"),
                        &types,
                        format!("enum declares no values of types [{}]", names.join(", ")),
                    ));
                }
                AttributeKind::Multi(MultiSchema { candidates })
            }
        };

        Ok(Attribute {
            name: name.to_string(),
            required,
            descriptor,
            kind,
        })
    }

    fn parse_kind(
        &self,
        ty: JsonType,
        node: &Node,
        required: bool,
        path: &FieldPath,
        depth: usize,
        in_union: bool,
    ) -> Result<AttributeKind, SchemaError> {
        let kind = match ty {
            JsonType::Boolean => AttributeKind::Boolean(BooleanSchema {
                enumeration: parse_enum(node, path, ty, in_union, JsonValue::as_bool)?,
            }),
            JsonType::Integer => AttributeKind::Integer(NumericSchema {
                enumeration: parse_enum(node, path, ty, in_union, |v| match v {
                    JsonValue::Number(n) if is_integral(n) => Some(n.clone()),
                    _ => None,
                })?,
            }),
            JsonType::Number => AttributeKind::Number(NumericSchema {
                enumeration: parse_enum(node, path, ty, in_union, as_number)?,
            }),
            JsonType::String => AttributeKind::String(StringSchema {
                format: optional_string(node, "format", path)?,
                enumeration: parse_enum(node, path, ty, in_union, |v| {
                    v.as_str().map(str::to_string)
                })?,
            }),
            JsonType::Null => AttributeKind::Null,
            JsonType::Array => {
                let items = match node.get("items") {
                    None => None,
                    Some(items) => Some(Box::new(self.parse_node(
                        items,
                        "items",
                        required,
                        &path.key("items"),
                        depth + 1,
                    )?)),
                };
                AttributeKind::Array(ArraySchema { items })
            }
            JsonType::Object => AttributeKind::Object(self.parse_object(node, path, depth)?),
        };
        Ok(kind)
    }

    fn parse_object(
        &self,
        node: &Node,
        path: &FieldPath,
        depth: usize,
    ) -> Result<ObjectSchema, SchemaError> {
        let required = required_names(node, path)?;

        let properties = match node.get("properties") {
            None => return Ok(ObjectSchema { properties: None }),
            Some(JsonValue::Object(map)) => map,
            Some(other) => {
                return Err(SchemaError::invalid(
                    &path.key("properties"),
                    &[JsonType::Object],
                    format!("properties must be an object, found {}", JsonType::of(other)),
                ))
            }
        };

        let props_path = path.key("properties");
        let mut parsed = Vec::with_capacity(properties.len());
        for (key, sub) in properties {
            parsed.push(self.parse_node(
                sub,
                key,
                required.contains(key.as_str()),
                &props_path.key(key.as_str()),
                depth + 1,
            )?);
        }

        Ok(ObjectSchema {
            properties: Some(order_properties(parsed, Attribute::is_object)),
        })
    }
}

fn declared_type(node: &Node, path: &FieldPath) -> Result<Declared, SchemaError> {
    let type_path = path.key("type");
    let all = JsonType::all();
    match node.get("type") {
        None => Err(SchemaError::invalid(&type_path, all, "missing type")),
        Some(JsonValue::String(token)) => token
            .parse()
            .map(Declared::Single)
            .map_err(|e: String| SchemaError::invalid(&type_path, all, e)),
        Some(JsonValue::Array(tokens)) => {
            if tokens.len() < 2 {
                return Err(SchemaError::invalid(
                    &type_path,
                    all,
                    format!(
                        "type array must declare at least two distinct types, found {}",
                        tokens.len()
                    ),
                ));
            }
            let mut types = Vec::with_capacity(tokens.len());
            for (i, token) in tokens.iter().enumerate() {
                let token_path = type_path.index(i);
                let token = token.as_str().ok_or_else(|| {
                    SchemaError::invalid(&token_path, all, "type token must be a string")
                })?;
                let ty: JsonType = token
                    .parse()
                    .map_err(|e: String| SchemaError::invalid(&token_path, all, e))?;
                if types.contains(&ty) {
                    return Err(SchemaError::invalid(
                        &token_path,
                        all,
                        format!("duplicate type token {token:?}"),
                    ));
                }
                types.push(ty);
            }
            Ok(Declared::Union(types))
        }
        Some(other) => Err(SchemaError::invalid(
            &type_path,
            all,
            format!("type must be a string or an array, found {}", JsonType::of(other)),
        )),
    }
}

fn parse_descriptor(node: &Node, path: &FieldPath) -> Result<Descriptor, SchemaError> {
    Ok(Descriptor {
        title: optional_string(node, "title", path)?,
        description: optional_string(node, "description", path)?,
    })
}

fn optional_string(node: &Node, key: &str, path: &FieldPath) -> Result<Option<String>, SchemaError> {
    match node.get(key) {
        None => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(SchemaError::invalid(
            &path.key(key),
            &[JsonType::String],
            format!("{key} must be a string, found {}", JsonType::of(other)),
        )),
    }
}

fn required_names<'a>(node: &'a Node, path: &FieldPath) -> Result<HashSet<&'a str>, SchemaError> {
    let required_path = path.key("required");
    match node.get("required") {
        None => Ok(HashSet::new()),
        Some(JsonValue::Array(names)) => names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                name.as_str().ok_or_else(|| {
                    SchemaError::invalid(
                        &required_path.index(i),
                        &[JsonType::String],
                        "required entries must be property names",
                    )
                })
            })
            .collect(),
        Some(other) => Err(SchemaError::invalid(
            &required_path,
            &[JsonType::Array],
            format!("required must be an array, found {}", JsonType::of(other)),
        )),
    }
}

/// Read the `enum` keyword for a branch of type `ty`.
///
/// In a union each branch keeps only the entries of its own type; a branch
/// left with none gets an empty set and never matches. Outside a union
/// every entry must match.
fn parse_enum<T>(
    node: &Node,
    path: &FieldPath,
    ty: JsonType,
    in_union: bool,
    extract: impl Fn(&JsonValue) -> Option<T>,
) -> Result<Option<Vec<T>>, SchemaError> {
    let enum_path = path.key("enum");
    let values = match node.get("enum") {
        None => return Ok(None),
        Some(JsonValue::Array(values)) => values,
        Some(other) => {
            return Err(SchemaError::invalid(
                &enum_path,
                &[JsonType::Array],
                format!("enum must be an array, found {}", JsonType::of(other)),
            ))
        }
    };
    if values.is_empty() {
        return Err(SchemaError::invalid(&enum_path, &[ty], "enum must not be empty"));
    }

    let mut accepted = Vec::with_capacity(values.len());
    for (i, value) in values.iter().enumerate() {
        match extract(value) {
            Some(v) => accepted.push(v),
            None if in_union => {}
            None => {
                return Err(SchemaError::invalid(
                    &enum_path.index(i),
                    &[ty],
                    format!("enum value {value} is not of type {ty}"),
                ))
            }
        }
    }
    if accepted.is_empty() && !in_union {
        return Err(SchemaError::invalid(
            &enum_path,
            &[ty],
            format!("enum declares no values of type {ty}"),
        ));
    }
    Ok(Some(accepted))
}

/// True for a union branch whose enumerated set came out empty.
fn excluded_by_enum(kind: &AttributeKind) -> bool {
    match kind {
        AttributeKind::Boolean(s) => s.enumeration.as_ref().is_some_and(Vec::is_empty),
        AttributeKind::Integer(s) | AttributeKind::Number(s) => {
            s.enumeration.as_ref().is_some_and(Vec::is_empty)
        }
        AttributeKind::String(s) => s.enumeration.as_ref().is_some_and(Vec::is_empty),
        _ => false,
    }
}

fn as_number(value: &JsonValue) -> Option<Number> {
    match value {
        JsonValue::Number(n) => Some(n.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::parse_value;
    use issuer_core::ErrorKind;
    use serde_json::json;

    fn parse(doc: JsonValue) -> Result<Attribute, SchemaError> {
        parse_attribute(&doc, "root", true)
    }

    fn invalid_path(err: SchemaError) -> String {
        match err {
            SchemaError::InvalidSchema { path, .. } => path.to_string(),
            other => panic!("Expected InvalidSchema, got: {other}"),
        }
    }

    #[test]
    fn test_parse_each_primitive() {
        for (token, expected) in [
            ("boolean", JsonType::Boolean),
            ("integer", JsonType::Integer),
            ("number", JsonType::Number),
            ("string", JsonType::String),
            ("null", JsonType::Null),
            ("array", JsonType::Array),
            ("object", JsonType::Object),
        ] {
            let attr = parse(json!({ "type": token })).unwrap();
            assert_eq!(attr.kind.json_type(), Some(expected));
            assert_eq!(attr.name, "root");
            assert!(attr.required);
        }
    }

    #[test]
    fn test_descriptor_and_format_preserved() {
        let attr = parse(json!({
            "type": "string",
            "title": "Birthday",
            "description": "Date of birth",
            "format": "date-time"
        }))
        .unwrap();
        assert_eq!(attr.descriptor.title.as_deref(), Some("Birthday"));
        assert_eq!(attr.descriptor.description.as_deref(), Some("Date of birth"));
        match attr.kind {
            AttributeKind::String(s) => assert_eq!(s.format.as_deref(), Some("date-time")),
            other => panic!("Expected string, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_type_rejected() {
        let err = parse(json!({ "title": "x" })).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSchema);
        assert_eq!(invalid_path(err), "type");
    }

    #[test]
    fn test_bad_type_shapes_rejected() {
        for doc in [
            json!({ "type": "float" }),
            json!({ "type": [] }),
            json!({ "type": ["string"] }),
            json!({ "type": ["string", "string"] }),
            json!({ "type": ["string", "decimal"] }),
            json!({ "type": ["string", 5] }),
            json!({ "type": 5 }),
            json!({ "type": { "a": 1 } }),
        ] {
            let err = parse(doc.clone()).unwrap_err();
            assert!(
                matches!(err, SchemaError::InvalidSchema { .. }),
                "Expected InvalidSchema for {doc}, got: {err}"
            );
        }
    }

    #[test]
    fn test_duplicate_token_path_points_at_entry() {
        let err = parse(json!({ "type": ["string", "integer", "string"] })).unwrap_err();
        assert_eq!(invalid_path(err), "type[2]");
    }

    #[test]
    fn test_non_object_node_rejected() {
        let err = parse(json!("string")).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidSchema { .. }));
    }

    #[test]
    fn test_multi_preserves_declaration_order() {
        let attr = parse(json!({ "type": ["string", "integer", "null"] })).unwrap();
        match &attr.kind {
            AttributeKind::Multi(multi) => {
                assert_eq!(
                    multi.types(),
                    [JsonType::String, JsonType::Integer, JsonType::Null]
                );
                assert!(multi.candidates.iter().all(|c| c.name == "root" && c.required));
            }
            other => panic!("Expected multi, got {other:?}"),
        }
    }

    #[test]
    fn test_multi_reparses_composite_keywords() {
        let attr = parse(json!({
            "type": ["object", "string"],
            "properties": { "id": { "type": "string" } },
            "format": "uri"
        }))
        .unwrap();
        let AttributeKind::Multi(multi) = &attr.kind else {
            panic!("Expected multi");
        };
        assert_eq!(multi.candidates[0].property_names(), ["id"]);
        match &multi.candidates[1].kind {
            AttributeKind::String(s) => assert_eq!(s.format.as_deref(), Some("uri")),
            other => panic!("Expected string branch, got {other:?}"),
        }
    }

    #[test]
    fn test_enum_parsed_per_type() {
        let attr = parse(json!({ "type": "integer", "enum": [1, 2, 3] })).unwrap();
        match attr.kind {
            AttributeKind::Integer(s) => assert_eq!(s.enumeration.unwrap().len(), 3),
            other => panic!("Expected integer, got {other:?}"),
        }
        let attr = parse(json!({ "type": "boolean", "enum": [true] })).unwrap();
        assert_eq!(
            attr.kind,
            AttributeKind::Boolean(BooleanSchema { enumeration: Some(vec![true]) })
        );
    }

    #[test]
    fn test_enum_type_mismatch_rejected() {
        let err = parse(json!({ "type": "integer", "enum": [1, "two"] })).unwrap_err();
        assert_eq!(invalid_path(err), "enum[1]");
        let err = parse(json!({ "type": "integer", "enum": [1.5] })).unwrap_err();
        assert_eq!(invalid_path(err), "enum[0]");
        let err = parse(json!({ "type": "string", "enum": [] })).unwrap_err();
        assert_eq!(invalid_path(err), "enum");
        let err = parse(json!({ "type": "string", "enum": "a" })).unwrap_err();
        assert_eq!(invalid_path(err), "enum");
    }

    #[test]
    fn test_union_enum_split_between_branches() {
        let attr = parse(json!({ "type": ["string", "integer"], "enum": ["a", 1, "b"] })).unwrap();
        let AttributeKind::Multi(multi) = &attr.kind else {
            panic!("Expected multi");
        };
        assert_eq!(
            multi.candidates[0].kind,
            AttributeKind::String(StringSchema {
                format: None,
                enumeration: Some(vec!["a".into(), "b".into()]),
            })
        );
        let err = parse(json!({ "type": ["string", "integer"], "enum": [true] })).unwrap_err();
        assert_eq!(invalid_path(err), "enum");
    }

    #[test]
    fn test_union_branch_without_enum_values_never_matches() {
        let attr = parse(json!({ "type": ["integer", "number"], "enum": [1.5] })).unwrap();
        let AttributeKind::Multi(multi) = &attr.kind else {
            panic!("Expected multi");
        };
        assert_eq!(
            multi.candidates[0].kind,
            AttributeKind::Integer(NumericSchema { enumeration: Some(vec![]) })
        );
        let value = parse_value(&attr, Some(&json!(1.5))).unwrap();
        assert_eq!(value.effective_type(), JsonType::Number);
        assert_eq!(
            parse_value(&attr, Some(&json!(1))).unwrap_err().kind(),
            ErrorKind::NoMatchingType
        );

        let attr = parse(json!({ "type": ["boolean", "string"], "enum": ["yes", "no"] })).unwrap();
        let value = parse_value(&attr, Some(&json!("yes"))).unwrap();
        assert_eq!(value.effective_type(), JsonType::String);
        assert!(parse_value(&attr, Some(&json!(true))).is_err());
    }

    #[test]
    fn test_union_enum_ignored_by_open_branch() {
        let attr = parse(json!({ "type": ["string", "object"], "enum": [1] })).unwrap();
        let value = parse_value(&attr, Some(&json!({ "k": 1 }))).unwrap();
        assert_eq!(value.effective_type(), JsonType::Object);
    }

    #[test]
    fn test_array_items_inherit_required() {
        let attr = parse_attribute(
            &json!({ "type": "array", "items": { "type": "string" } }),
            "tags",
            false,
        )
        .unwrap();
        let AttributeKind::Array(ArraySchema { items: Some(items) }) = &attr.kind else {
            panic!("Expected typed array");
        };
        assert_eq!(items.name, "items");
        assert!(!items.required);

        let untyped = parse(json!({ "type": "array" })).unwrap();
        assert_eq!(untyped.kind, AttributeKind::Array(ArraySchema { items: None }));
    }

    #[test]
    fn test_object_required_flags_and_ordering() {
        let attr = parse(json!({
            "type": "object",
            "properties": {
                "address": { "type": "object", "properties": { "city": { "type": "string" } } },
                "name": { "type": "string" },
                "meta": { "type": "object" },
                "age": { "type": "integer" }
            },
            "required": ["name", "address", "undeclared"]
        }))
        .unwrap();
        assert_eq!(attr.property_names(), ["name", "age", "address", "meta"]);
        assert!(attr.property("name").unwrap().required);
        assert!(!attr.property("age").unwrap().required);
        assert!(attr.property("address").unwrap().required);
        assert!(!attr.property("meta").unwrap().required);
        assert_eq!(
            attr.property("meta").unwrap().kind,
            AttributeKind::Object(ObjectSchema { properties: None })
        );
    }

    #[test]
    fn test_nested_error_reports_full_path() {
        let err = parse(json!({
            "type": "object",
            "properties": {
                "credentialSubject": {
                    "type": "object",
                    "properties": { "age": { "type": "int" } }
                }
            }
        }))
        .unwrap_err();
        assert_eq!(
            invalid_path(err),
            "properties.credentialSubject.properties.age.type"
        );
    }

    #[test]
    fn test_malformed_object_keywords_rejected() {
        let err = parse(json!({ "type": "object", "properties": [] })).unwrap_err();
        assert_eq!(invalid_path(err), "properties");
        let err = parse(json!({ "type": "object", "required": "name" })).unwrap_err();
        assert_eq!(invalid_path(err), "required");
        let err = parse(json!({ "type": "object", "required": [1] })).unwrap_err();
        assert_eq!(invalid_path(err), "required[0]");
        let err = parse(json!({ "type": "string", "title": 7 })).unwrap_err();
        assert_eq!(invalid_path(err), "title");
    }

    #[test]
    fn test_depth_limit() {
        let mut doc = json!({ "type": "string" });
        for _ in 0..5 {
            doc = json!({ "type": "array", "items": doc });
        }
        let shallow = SchemaParser::new(ParserConfig::with_max_depth(4));
        let err = shallow.parse_attribute(&doc, "deep", true).unwrap_err();
        assert!(err.to_string().contains("maximum depth of 4"), "{err}");

        let deep = SchemaParser::new(ParserConfig::with_max_depth(5));
        assert!(deep.parse_attribute(&doc, "deep", true).is_ok());
    }

    #[test]
    fn test_to_document_round_trip() {
        let doc = json!({
            "type": "object",
            "title": "KYC",
            "properties": {
                "id": { "type": "string", "format": "uri" },
                "issuer": {
                    "type": ["string", "object"],
                    "properties": { "id": { "type": "string" } },
                    "required": ["id"]
                },
                "level": { "type": ["string", "integer"], "enum": ["gold", 2] },
                "tags": { "type": "array", "items": { "type": "string", "enum": ["a", "b"] } },
                "score": { "type": "number", "enum": [1.5, 2] }
            },
            "required": ["id"]
        });
        let first = parse(doc).unwrap();
        let second = parse(first.to_document()).unwrap();
        assert_eq!(first, second);
    }
}
