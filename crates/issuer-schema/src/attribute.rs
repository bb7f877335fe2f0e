//! # Attribute Model
//!
//! The typed, immutable tree a credential schema document parses into.
//!
//! An [`Attribute`] is a common header (name, required flag, descriptive
//! text) plus an [`AttributeKind`] — a closed sum over the eight schema
//! variants. Every dispatch over `AttributeKind` is an exhaustive `match`,
//! so adding a variant is a compile-time-enforced change across parser,
//! validator, projection, and resolver.
//!
//! ## Ordering Invariant
//!
//! Object properties are stored with every non-object property before
//! every object property, each group in document order (see
//! [`order_properties`]). Downstream flattening into credential subjects and
//! Merkle-tree leaves relies on leaves being visited before nested objects.

use issuer_core::{FieldPath, JsonType, PathSegment};
use serde_json::{Map, Number, Value as JsonValue};

/// Descriptive schema text. Irrelevant to validation; kept for display and
/// for re-emitting the schema document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Descriptor {
    /// `title` keyword.
    pub title: Option<String>,
    /// `description` keyword.
    pub description: Option<String>,
}

/// A parsed schema node.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// Property name (the key under `properties`, `"items"` for array
    /// elements, empty for the schema root).
    pub name: String,
    /// Whether a value must be present.
    pub required: bool,
    /// Descriptive text.
    pub descriptor: Descriptor,
    /// Variant-specific schema data.
    pub kind: AttributeKind,
}

/// The eight attribute variants.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeKind {
    /// `"type": "boolean"`.
    Boolean(BooleanSchema),
    /// `"type": "integer"`.
    Integer(NumericSchema),
    /// `"type": "number"`.
    Number(NumericSchema),
    /// `"type": "string"`.
    String(StringSchema),
    /// `"type": "null"`.
    Null,
    /// `"type": "array"`.
    Array(ArraySchema),
    /// `"type": "object"`.
    Object(ObjectSchema),
    /// `"type": [..]` with two or more distinct tokens.
    Multi(MultiSchema),
}

/// Boolean restrictions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BooleanSchema {
    /// Non-empty set of accepted values.
    pub enumeration: Option<Vec<bool>>,
}

/// Integer or number restrictions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumericSchema {
    /// Non-empty set of accepted values, as written in the schema.
    pub enumeration: Option<Vec<Number>>,
}

/// String restrictions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringSchema {
    /// `format` tag (`date-time`, `uri`, ...). Carried, not enforced.
    pub format: Option<String>,
    /// Non-empty set of accepted values.
    pub enumeration: Option<Vec<String>>,
}

/// Array element schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArraySchema {
    /// Element schema; `None` leaves elements untyped.
    pub items: Option<Box<Attribute>>,
}

/// Object property schemas.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    /// Ordered properties; `None` means no property constraints.
    pub properties: Option<Vec<Attribute>>,
}

/// Union of candidate schemas, one per declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiSchema {
    /// Candidates in declaration order. Never contains a `Multi`.
    pub candidates: Vec<Attribute>,
}

impl AttributeKind {
    /// The declared JSON type. `None` for unions.
    pub fn json_type(&self) -> Option<JsonType> {
        match self {
            Self::Boolean(_) => Some(JsonType::Boolean),
            Self::Integer(_) => Some(JsonType::Integer),
            Self::Number(_) => Some(JsonType::Number),
            Self::String(_) => Some(JsonType::String),
            Self::Null => Some(JsonType::Null),
            Self::Array(_) => Some(JsonType::Array),
            Self::Object(_) => Some(JsonType::Object),
            Self::Multi(_) => None,
        }
    }
}

impl MultiSchema {
    /// Candidate types in declaration order.
    pub fn types(&self) -> Vec<JsonType> {
        self.candidates
            .iter()
            .filter_map(|c| c.kind.json_type())
            .collect()
    }
}

impl Attribute {
    /// Declared types: one entry for plain attributes, the candidate list
    /// for unions.
    pub fn declared_types(&self) -> Vec<JsonType> {
        match &self.kind {
            AttributeKind::Multi(multi) => multi.types(),
            other => other.json_type().into_iter().collect(),
        }
    }

    /// True for `Object` attributes (unions are not object-typed, even when
    /// one candidate is an object).
    pub fn is_object(&self) -> bool {
        matches!(self.kind, AttributeKind::Object(_))
    }

    /// Declared properties of an `Object` attribute.
    pub fn properties(&self) -> Option<&[Attribute]> {
        match &self.kind {
            AttributeKind::Object(ObjectSchema { properties: Some(props) }) => Some(props),
            _ => None,
        }
    }

    /// Property names in stored order. Empty for non-objects.
    pub fn property_names(&self) -> Vec<&str> {
        self.properties()
            .map(|props| props.iter().map(|p| p.name.as_str()).collect())
            .unwrap_or_default()
    }

    /// Look up a direct property by name.
    pub fn property(&self, name: &str) -> Option<&Attribute> {
        self.properties()?.iter().find(|p| p.name == name)
    }

    /// Walk nested object properties along `path`.
    ///
    /// Key segments descend into object properties; an `items` key on an
    /// array descends into its element schema. Index segments are skipped,
    /// as every element shares the element schema.
    pub fn find(&self, path: &FieldPath) -> Option<&Attribute> {
        let mut node = self;
        for segment in path.segments() {
            node = match (segment, &node.kind) {
                (PathSegment::Index(_), AttributeKind::Array(_)) => node,
                (PathSegment::Key(k), AttributeKind::Array(ArraySchema { items: Some(items) }))
                    if k == "items" =>
                {
                    items.as_ref()
                }
                (PathSegment::Key(k), _) => node.property(k)?,
                (PathSegment::Index(_), _) => return None,
            };
        }
        Some(node)
    }

    /// Re-emit this attribute as a JSON Schema document.
    ///
    /// Unions are written back as a `type` array with the keywords of all
    /// candidates merged, which parses back into an equal attribute.
    pub fn to_document(&self) -> JsonValue {
        let mut doc = Map::new();
        match &self.kind {
            AttributeKind::Multi(multi) => {
                let types: Vec<JsonValue> = multi
                    .types()
                    .iter()
                    .map(|t| JsonValue::String(t.as_str().to_string()))
                    .collect();
                doc.insert("type".into(), JsonValue::Array(types));
                let mut enumeration = Vec::new();
                for candidate in &multi.candidates {
                    write_keywords(&candidate.kind, &mut doc, &mut enumeration);
                }
                if !enumeration.is_empty() {
                    doc.insert("enum".into(), JsonValue::Array(enumeration));
                }
            }
            kind => {
                if let Some(ty) = kind.json_type() {
                    doc.insert("type".into(), JsonValue::String(ty.as_str().to_string()));
                }
                let mut enumeration = Vec::new();
                write_keywords(kind, &mut doc, &mut enumeration);
                if !enumeration.is_empty() {
                    doc.insert("enum".into(), JsonValue::Array(enumeration));
                }
            }
        }
        if let Some(title) = &self.descriptor.title {
            doc.insert("title".into(), JsonValue::String(title.clone()));
        }
        if let Some(description) = &self.descriptor.description {
            doc.insert("description".into(), JsonValue::String(description.clone()));
        }
        JsonValue::Object(doc)
    }
}

fn write_keywords(kind: &AttributeKind, doc: &mut Map<String, JsonValue>, enumeration: &mut Vec<JsonValue>) {
    match kind {
        AttributeKind::Boolean(s) => {
            if let Some(values) = &s.enumeration {
                enumeration.extend(values.iter().map(|b| JsonValue::Bool(*b)));
            }
        }
        AttributeKind::Integer(s) | AttributeKind::Number(s) => {
            if let Some(values) = &s.enumeration {
                enumeration.extend(values.iter().cloned().map(JsonValue::Number));
            }
        }
        AttributeKind::String(s) => {
            if let Some(format) = &s.format {
                doc.insert("format".into(), JsonValue::String(format.clone()));
            }
            if let Some(values) = &s.enumeration {
                enumeration.extend(values.iter().cloned().map(JsonValue::String));
            }
        }
        AttributeKind::Null => {}
        AttributeKind::Array(s) => {
            if let Some(items) = &s.items {
                doc.insert("items".into(), items.to_document());
            }
        }
        AttributeKind::Object(s) => {
            if let Some(props) = &s.properties {
                let mut properties = Map::new();
                let mut required = Vec::new();
                for prop in props {
                    properties.insert(prop.name.clone(), prop.to_document());
                    if prop.required {
                        required.push(JsonValue::String(prop.name.clone()));
                    }
                }
                doc.insert("properties".into(), JsonValue::Object(properties));
                if !required.is_empty() {
                    doc.insert("required".into(), JsonValue::Array(required));
                }
            }
        }
        // Candidates are never unions.
        AttributeKind::Multi(_) => {}
    }
}

/// Stable partition placing every non-object item before every object item.
///
/// Relative order inside each group is preserved. Used for parsed
/// properties and, again, for validated object values.
pub fn order_properties<T>(items: Vec<T>, is_object: impl Fn(&T) -> bool) -> Vec<T> {
    let (objects, leaves): (Vec<T>, Vec<T>) = items.into_iter().partition(|item| is_object(item));
    leaves.into_iter().chain(objects).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str) -> Attribute {
        Attribute {
            name: name.to_string(),
            required: false,
            descriptor: Descriptor::default(),
            kind: AttributeKind::String(StringSchema::default()),
        }
    }

    fn object(name: &str, props: Vec<Attribute>) -> Attribute {
        Attribute {
            name: name.to_string(),
            required: true,
            descriptor: Descriptor::default(),
            kind: AttributeKind::Object(ObjectSchema { properties: Some(props) }),
        }
    }

    #[test]
    fn test_order_properties_objects_last_stable() {
        let items = vec![
            object("a", vec![]),
            leaf("b"),
            object("c", vec![]),
            leaf("d"),
        ];
        let ordered = order_properties(items, Attribute::is_object);
        let names: Vec<&str> = ordered.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["b", "d", "a", "c"]);
    }

    #[test]
    fn test_property_lookup_and_find() {
        let root = object(
            "",
            vec![leaf("id"), object("credentialSubject", vec![leaf("birthday")])],
        );
        assert_eq!(root.property_names(), ["id", "credentialSubject"]);
        assert!(root.property("missing").is_none());
        let found = root
            .find(&FieldPath::from_dotted("credentialSubject.birthday"))
            .unwrap();
        assert_eq!(found.name, "birthday");
        assert!(root.find(&FieldPath::from_dotted("id.nested")).is_none());
        assert_eq!(root.find(&FieldPath::root()), Some(&root));
    }

    #[test]
    fn test_find_through_array_items() {
        let root = object(
            "",
            vec![Attribute {
                name: "tags".into(),
                required: false,
                descriptor: Descriptor::default(),
                kind: AttributeKind::Array(ArraySchema { items: Some(Box::new(leaf("items"))) }),
            }],
        );
        let path = FieldPath::root().key("tags").index(3);
        assert_eq!(root.find(&path).unwrap().name, "tags");
        let path = FieldPath::root().key("tags").key("items");
        assert_eq!(root.find(&path).unwrap().name, "items");
    }

    #[test]
    fn test_declared_types() {
        let multi = Attribute {
            name: "issuer".into(),
            required: true,
            descriptor: Descriptor::default(),
            kind: AttributeKind::Multi(MultiSchema {
                candidates: vec![leaf("issuer"), object("issuer", vec![])],
            }),
        };
        assert_eq!(multi.declared_types(), [JsonType::String, JsonType::Object]);
        assert!(!multi.is_object());
        assert_eq!(leaf("x").declared_types(), [JsonType::String]);
    }

    #[test]
    fn test_to_document_writes_descriptor_and_required() {
        let mut root = object("", vec![leaf("name")]);
        if let AttributeKind::Object(ObjectSchema { properties: Some(props) }) = &mut root.kind {
            props[0].required = true;
        }
        root.descriptor.title = Some("Person".into());
        let doc = root.to_document();
        assert_eq!(doc["type"], "object");
        assert_eq!(doc["title"], "Person");
        assert_eq!(doc["properties"]["name"]["type"], "string");
        assert_eq!(doc["required"], serde_json::json!(["name"]));
    }
}
