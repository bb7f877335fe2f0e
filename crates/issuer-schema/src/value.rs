//! # Value Tree
//!
//! Typed result of validating a candidate value document against an
//! [`Attribute`] tree. Each node borrows the attribute it was validated
//! against, so a value tree never outlives the (cached) schema it came from
//! and never copies schema data.
//!
//! Absent optional fields are kept as nodes with no value, so the tree has
//! the same shape as the schema. [`Value::to_json`] drops them again when
//! projecting the tree into a credential subject.

use issuer_core::JsonType;
use serde_json::{Map, Number, Value as JsonValue};

use crate::attribute::Attribute;

/// A validated value node.
#[derive(Debug, Clone, PartialEq)]
pub struct Value<'a> {
    attribute: &'a Attribute,
    data: ValueData<'a>,
}

/// Native payload of a [`Value`], by attribute variant.
///
/// `None` marks an absent optional value.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueData<'a> {
    /// Boolean value.
    Boolean(Option<bool>),
    /// Integral number, exactly as supplied.
    Integer(Option<Number>),
    /// Any number, exactly as supplied.
    Number(Option<Number>),
    /// String value.
    String(Option<String>),
    /// The `null` literal; `present` is false when the field was absent.
    Null {
        /// Whether `null` was supplied.
        present: bool,
    },
    /// Array elements.
    Array(Option<Elements<'a>>),
    /// Object properties.
    Object(Option<Properties<'a>>),
    /// Value of the first union candidate that accepted the input.
    Multi(Box<Value<'a>>),
}

/// Elements of an array value.
#[derive(Debug, Clone, PartialEq)]
pub enum Elements<'a> {
    /// Elements validated against the declared `items` schema.
    Typed(Vec<Value<'a>>),
    /// Elements of an array with no `items` schema, passed through.
    Untyped(Vec<JsonValue>),
}

/// Properties of an object value.
#[derive(Debug, Clone, PartialEq)]
pub enum Properties<'a> {
    /// One node per declared property, non-objects first.
    Typed(Vec<Value<'a>>),
    /// Content of an object with no declared properties, passed through.
    Untyped(Map<String, JsonValue>),
}

impl<'a> Value<'a> {
    pub(crate) fn new(attribute: &'a Attribute, data: ValueData<'a>) -> Self {
        Self { attribute, data }
    }

    /// The attribute this value was validated against.
    pub fn attribute(&self) -> &'a Attribute {
        self.attribute
    }

    /// Attribute name.
    pub fn name(&self) -> &'a str {
        &self.attribute.name
    }

    /// Whether the attribute is required.
    pub fn required(&self) -> bool {
        self.attribute.required
    }

    /// The native payload.
    pub fn data(&self) -> &ValueData<'a> {
        &self.data
    }

    /// True when the (optional) value was not supplied.
    pub fn is_absent(&self) -> bool {
        match &self.data {
            ValueData::Boolean(v) => v.is_none(),
            ValueData::Integer(v) | ValueData::Number(v) => v.is_none(),
            ValueData::String(v) => v.is_none(),
            ValueData::Null { present } => !present,
            ValueData::Array(v) => v.is_none(),
            ValueData::Object(v) => v.is_none(),
            ValueData::Multi(inner) => inner.is_absent(),
        }
    }

    /// The type the value was accepted as. For unions, the winning
    /// candidate's type.
    pub fn effective_type(&self) -> JsonType {
        match &self.data {
            ValueData::Boolean(_) => JsonType::Boolean,
            ValueData::Integer(_) => JsonType::Integer,
            ValueData::Number(_) => JsonType::Number,
            ValueData::String(_) => JsonType::String,
            ValueData::Null { .. } => JsonType::Null,
            ValueData::Array(_) => JsonType::Array,
            ValueData::Object(_) => JsonType::Object,
            ValueData::Multi(inner) => inner.effective_type(),
        }
    }

    /// Child nodes of a typed object (or of a union resolved to one).
    pub fn properties(&self) -> &[Value<'a>] {
        match &self.data {
            ValueData::Object(Some(Properties::Typed(children))) => children,
            ValueData::Multi(inner) => inner.properties(),
            _ => &[],
        }
    }

    /// Child node by property name.
    pub fn property(&self, name: &str) -> Option<&Value<'a>> {
        self.properties().iter().find(|v| v.name() == name)
    }

    /// Project the tree back into a JSON document.
    ///
    /// Returns `None` for an absent value; absent properties are omitted
    /// from objects. Object keys follow the value tree's order.
    pub fn to_json(&self) -> Option<JsonValue> {
        let json = match &self.data {
            ValueData::Boolean(v) => JsonValue::Bool((*v)?),
            ValueData::Integer(v) | ValueData::Number(v) => JsonValue::Number(v.clone()?),
            ValueData::String(v) => JsonValue::String(v.clone()?),
            ValueData::Null { present: true } => JsonValue::Null,
            ValueData::Null { present: false } => return None,
            ValueData::Array(v) => match v.as_ref()? {
                Elements::Typed(elements) => JsonValue::Array(
                    elements
                        .iter()
                        .map(|e| e.to_json().unwrap_or(JsonValue::Null))
                        .collect(),
                ),
                Elements::Untyped(elements) => JsonValue::Array(elements.clone()),
            },
            ValueData::Object(v) => match v.as_ref()? {
                Properties::Typed(children) => {
                    let mut map = Map::new();
                    for child in children {
                        if let Some(json) = child.to_json() {
                            map.insert(child.name().to_string(), json);
                        }
                    }
                    JsonValue::Object(map)
                }
                Properties::Untyped(map) => JsonValue::Object(map.clone()),
            },
            ValueData::Multi(inner) => return inner.to_json(),
        };
        Some(json)
    }
}
