//! Parser configuration.

use serde::{Deserialize, Serialize};

/// Default bound on schema nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Limits applied while parsing schema documents.
///
/// Schema documents arrive from an import endpoint and are untrusted; the
/// depth bound keeps recursion on adversarial input finite. Value validation
/// walks the parsed attribute tree and inherits the same bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParserConfig {
    /// Maximum number of nested `properties`/`items` levels below the root.
    pub max_depth: usize,
}

impl ParserConfig {
    /// Config with a custom depth bound.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
