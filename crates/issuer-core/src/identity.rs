//! # Semantic Identifiers
//!
//! Validated URI newtype used for JSON-LD `@id` bindings. The original
//! string is kept verbatim: type identifiers end up in issued credentials
//! and must not be normalized behind the issuer's back.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::UriError;

/// An absolute URI, validated at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Uri(String);

impl Uri {
    /// Parse and validate an absolute URI.
    ///
    /// # Errors
    ///
    /// Returns [`UriError::Empty`] for blank input and [`UriError::Invalid`]
    /// when the input has no scheme or fails RFC 3986 parsing.
    pub fn parse(value: &str) -> Result<Self, UriError> {
        if value.trim().is_empty() {
            return Err(UriError::Empty);
        }
        url::Url::parse(value).map_err(|e| UriError::Invalid {
            value: value.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self(value.to_string()))
    }

    /// Access the URI as written.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append `suffix` to this URI and validate the result.
    ///
    /// Used when a JSON-LD context declares a base `schema-id` and names
    /// types relative to it.
    ///
    /// # Errors
    ///
    /// Returns [`UriError::Invalid`] if the concatenation is not a URI.
    pub fn join_suffix(&self, suffix: &str) -> Result<Self, UriError> {
        Self::parse(&format!("{}{suffix}", self.0))
    }
}

impl std::fmt::Display for Uri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Uri {
    type Err = UriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for Uri {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
