//! # Attribute Value Validator
//!
//! Validates an untyped value document against a parsed [`Attribute`] tree
//! and produces a typed [`Value`] tree. Pure: no I/O, no shared state.
//!
//! ## Rules
//!
//! - Primitives must match their runtime shape and, when declared, their
//!   enumerated set.
//! - Absent values are accepted only for optional attributes. A JSON `null`
//!   counts as absent unless the attribute itself admits `null`.
//! - Object members are checked in input order and the first conflict is
//!   reported, whether an undeclared key or a bad value. Missing required
//!   members are reported only once every supplied member passes.
//! - Unions try candidates in declaration order and keep the first that
//!   accepts the value. Candidate errors are not surfaced.

use issuer_core::{FieldPath, JsonType};
use serde_json::{Map, Number, Value as JsonValue};

use crate::attribute::{order_properties, Attribute, AttributeKind, MultiSchema};
use crate::error::SchemaError;
use crate::value::{Elements, Properties, Value, ValueData};

/// Validate `document` against `attribute`. `None` means the value is
/// absent.
///
/// # Errors
///
/// Returns the first mismatch found: [`SchemaError::MissingRequired`],
/// [`SchemaError::TypeMismatch`], [`SchemaError::EnumViolation`],
/// [`SchemaError::UnknownAttribute`], or [`SchemaError::NoMatchingType`].
pub fn parse_value<'a>(
    attribute: &'a Attribute,
    document: Option<&JsonValue>,
) -> Result<Value<'a>, SchemaError> {
    validate_at(attribute, document, &FieldPath::root())
}

/// Like [`parse_value`], reporting error paths relative to `path`.
///
/// # Errors
///
/// See [`parse_value`].
pub fn validate_at<'a>(
    attribute: &'a Attribute,
    document: Option<&JsonValue>,
    path: &FieldPath,
) -> Result<Value<'a>, SchemaError> {
    let document = match document {
        Some(JsonValue::Null) if !admits_null(&attribute.kind) => None,
        other => other,
    };
    validate_kind(attribute, document, path)
}

/// True for numbers with no fractional part (`5`, `-3`, `5.0`).
pub(crate) fn is_integral(n: &Number) -> bool {
    n.is_i64()
        || n.is_u64()
        || n
            .as_f64()
            .is_some_and(|f| f.is_finite() && f.fract() == 0.0)
}

fn admits_null(kind: &AttributeKind) -> bool {
    match kind {
        AttributeKind::Null => true,
        AttributeKind::Multi(multi) => multi
            .candidates
            .iter()
            .any(|c| matches!(c.kind, AttributeKind::Null)),
        _ => false,
    }
}

fn validate_kind<'a>(
    attribute: &'a Attribute,
    document: Option<&JsonValue>,
    path: &FieldPath,
) -> Result<Value<'a>, SchemaError> {
    if document.is_none() && attribute.required {
        return Err(SchemaError::MissingRequired { path: path.clone() });
    }

    let data = match (&attribute.kind, document) {
        (AttributeKind::Multi(multi), document) => {
            return validate_multi(attribute, multi, document, path)
        }

        (AttributeKind::Boolean(_), None) => ValueData::Boolean(None),
        (AttributeKind::Integer(_), None) => ValueData::Integer(None),
        (AttributeKind::Number(_), None) => ValueData::Number(None),
        (AttributeKind::String(_), None) => ValueData::String(None),
        (AttributeKind::Null, None) => ValueData::Null { present: false },
        (AttributeKind::Array(_), None) => ValueData::Array(None),
        (AttributeKind::Object(_), None) => ValueData::Object(None),

        (AttributeKind::Boolean(schema), Some(doc)) => {
            let b = doc
                .as_bool()
                .ok_or_else(|| mismatch(path, JsonType::Boolean, doc))?;
            check_enum(&schema.enumeration, |v| *v == b, path, doc)?;
            ValueData::Boolean(Some(b))
        }
        (AttributeKind::Integer(schema), Some(doc)) => {
            let n = match doc {
                JsonValue::Number(n) if is_integral(n) => n,
                _ => return Err(mismatch(path, JsonType::Integer, doc)),
            };
            check_enum(&schema.enumeration, |v| numbers_equal(v, n), path, doc)?;
            ValueData::Integer(Some(n.clone()))
        }
        (AttributeKind::Number(schema), Some(doc)) => {
            let n = match doc {
                JsonValue::Number(n) => n,
                _ => return Err(mismatch(path, JsonType::Number, doc)),
            };
            check_enum(&schema.enumeration, |v| numbers_equal(v, n), path, doc)?;
            ValueData::Number(Some(n.clone()))
        }
        (AttributeKind::String(schema), Some(doc)) => {
            let s = doc
                .as_str()
                .ok_or_else(|| mismatch(path, JsonType::String, doc))?;
            check_enum(&schema.enumeration, |v| v == s, path, doc)?;
            ValueData::String(Some(s.to_string()))
        }
        (AttributeKind::Null, Some(doc)) => {
            if !doc.is_null() {
                return Err(mismatch(path, JsonType::Null, doc));
            }
            ValueData::Null { present: true }
        }
        (AttributeKind::Array(schema), Some(doc)) => {
            let elements = doc
                .as_array()
                .ok_or_else(|| mismatch(path, JsonType::Array, doc))?;
            let elements = match &schema.items {
                Some(items) => {
                    let mut typed = Vec::with_capacity(elements.len());
                    for (i, element) in elements.iter().enumerate() {
                        typed.push(validate_at(items, Some(element), &path.index(i))?);
                    }
                    Elements::Typed(typed)
                }
                None => Elements::Untyped(elements.clone()),
            };
            ValueData::Array(Some(elements))
        }
        (AttributeKind::Object(schema), Some(doc)) => {
            let map = doc
                .as_object()
                .ok_or_else(|| mismatch(path, JsonType::Object, doc))?;
            let properties = match &schema.properties {
                None => Properties::Untyped(map.clone()),
                Some(declared) => Properties::Typed(validate_properties(declared, map, path)?),
            };
            ValueData::Object(Some(properties))
        }
    };

    Ok(Value::new(attribute, data))
}

/// Validate an object's members against its declared properties.
///
/// Supplied keys are checked in input order, so the first conflicting key
/// is the one reported. Declared properties left unsupplied are checked
/// afterwards, in property order.
fn validate_properties<'a>(
    declared: &'a [Attribute],
    map: &Map<String, JsonValue>,
    path: &FieldPath,
) -> Result<Vec<Value<'a>>, SchemaError> {
    let mut slots: Vec<Option<Value<'a>>> = vec![None; declared.len()];
    for (key, member) in map {
        let Some(index) = declared.iter().position(|p| &p.name == key) else {
            return Err(SchemaError::UnknownAttribute {
                path: path.clone(),
                key: key.clone(),
            });
        };
        slots[index] = Some(validate_at(&declared[index], Some(member), &path.key(key.as_str()))?);
    }

    let mut children = Vec::with_capacity(declared.len());
    for (prop, slot) in declared.iter().zip(slots) {
        let child = match slot {
            Some(child) => child,
            None => validate_at(prop, None, &path.key(prop.name.as_str()))?,
        };
        children.push(child);
    }
    Ok(order_properties(children, |v| v.attribute().is_object()))
}

/// First-match-wins union resolution.
fn validate_multi<'a>(
    attribute: &'a Attribute,
    multi: &'a MultiSchema,
    document: Option<&JsonValue>,
    path: &FieldPath,
) -> Result<Value<'a>, SchemaError> {
    for candidate in &multi.candidates {
        match validate_kind(candidate, document, path) {
            Ok(value) => return Ok(Value::new(attribute, ValueData::Multi(Box::new(value)))),
            Err(err) => tracing::trace!(
                path = %path,
                candidate = ?candidate.kind.json_type(),
                error = %err,
                "union candidate rejected value"
            ),
        }
    }
    Err(SchemaError::NoMatchingType {
        path: path.clone(),
        candidates: multi.types(),
    })
}

fn mismatch(path: &FieldPath, expected: JsonType, found: &JsonValue) -> SchemaError {
    SchemaError::TypeMismatch {
        path: path.clone(),
        expected,
        found: JsonType::of(found),
    }
}

fn check_enum<T>(
    allowed: &Option<Vec<T>>,
    accepts: impl Fn(&T) -> bool,
    path: &FieldPath,
    document: &JsonValue,
) -> Result<(), SchemaError>
where
    T: Clone + Into<JsonValue>,
{
    match allowed {
        Some(values) if !values.iter().any(|v| accepts(v)) => Err(SchemaError::EnumViolation {
            path: path.clone(),
            value: document.clone(),
            allowed: values.iter().cloned().map(Into::into).collect(),
        }),
        _ => Ok(()),
    }
}

/// Numeric equality across integer and float representations (`2 == 2.0`).
fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    a.as_f64() == b.as_f64()
}
