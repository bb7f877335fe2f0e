//! # JSON Type Tokens
//!
//! The seven `type` literals a credential schema may declare. Schema parsing
//! dispatches on these tokens, value validation checks runtime shapes
//! against them, and union attributes list them in declaration order.
//! Every `match` on `JsonType` is exhaustive.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Number of JSON type tokens.
pub const JSON_TYPE_COUNT: usize = 7;

/// A JSON Schema primitive or composite type token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    /// `true` / `false`.
    Boolean,
    /// Number with no fractional part.
    Integer,
    /// Any JSON number.
    Number,
    /// UTF-8 string.
    String,
    /// The JSON `null` literal.
    Null,
    /// Ordered sequence.
    Array,
    /// Key/value mapping.
    Object,
}

impl JsonType {
    /// Returns all type tokens in canonical order.
    pub fn all() -> &'static [JsonType; JSON_TYPE_COUNT] {
        &[
            Self::Boolean,
            Self::Integer,
            Self::Number,
            Self::String,
            Self::Null,
            Self::Array,
            Self::Object,
        ]
    }

    /// The schema literal for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
            Self::Null => "null",
            Self::Array => "array",
            Self::Object => "object",
        }
    }

    /// True for the scalar types that may carry an `enum` restriction.
    pub fn supports_enum(&self) -> bool {
        matches!(
            self,
            Self::Boolean | Self::Integer | Self::Number | Self::String
        )
    }

    /// Runtime type of a decoded JSON value.
    ///
    /// Integral numbers report [`JsonType::Integer`].
    pub fn of(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(_) => Self::Boolean,
            serde_json::Value::Number(n) if n.is_i64() || n.is_u64() => Self::Integer,
            serde_json::Value::Number(_) => Self::Number,
            serde_json::Value::String(_) => Self::String,
            serde_json::Value::Array(_) => Self::Array,
            serde_json::Value::Object(_) => Self::Object,
        }
    }
}

impl std::fmt::Display for JsonType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JsonType {
    type Err = String;

    /// Parse a type token. Case-sensitive, as in JSON Schema.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "boolean" => Ok(Self::Boolean),
            "integer" => Ok(Self::Integer),
            "number" => Ok(Self::Number),
            "string" => Ok(Self::String),
            "null" => Ok(Self::Null),
            "array" => Ok(Self::Array),
            "object" => Ok(Self::Object),
            other => Err(format!("unknown type token: {other:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_as_str_roundtrip() {
        for ty in JsonType::all() {
            let parsed: JsonType = ty.as_str().parse().unwrap();
            assert_eq!(*ty, parsed);
        }
    }

    #[test]
    fn test_from_str_is_case_sensitive() {
        assert!("String".parse::<JsonType>().is_err());
        assert!("".parse::<JsonType>().is_err());
        assert!("float".parse::<JsonType>().is_err());
    }

    #[test]
    fn test_serde_format_matches_as_str() {
        for ty in JsonType::all() {
            let json = serde_json::to_string(ty).unwrap();
            assert_eq!(json, format!("\"{}\"", ty.as_str()));
        }
    }

    #[test]
    fn test_runtime_type_of() {
        assert_eq!(JsonType::of(&json!(5)), JsonType::Integer);
        assert_eq!(JsonType::of(&json!(-5)), JsonType::Integer);
        assert_eq!(JsonType::of(&json!(5.5)), JsonType::Number);
        assert_eq!(JsonType::of(&json!("5")), JsonType::String);
        assert_eq!(JsonType::of(&json!(null)), JsonType::Null);
        assert_eq!(JsonType::of(&json!([])), JsonType::Array);
        assert_eq!(JsonType::of(&json!({})), JsonType::Object);
        assert_eq!(JsonType::of(&json!(true)), JsonType::Boolean);
    }

    #[test]
    fn test_enum_support() {
        assert!(JsonType::String.supports_enum());
        assert!(!JsonType::Null.supports_enum());
        assert!(!JsonType::Object.supports_enum());
        assert!(!JsonType::Array.supports_enum());
    }
}
