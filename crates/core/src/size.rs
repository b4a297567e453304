use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Sentinel size name meaning "serve the stored bytes at their original
/// dimensions". A spec carrying this name never enters the transform
/// pipeline.
pub const ORIGINAL_SIZE_NAME: &str = "original";

/// A resolved target size for a transform.
///
/// Width and height are strictly positive for a transformable spec. The
/// `original` sentinel and specs degraded from unparseable tokens carry zero
/// dimensions and are treated as "skip transform" downstream, never as an
/// error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub width: u32,
    pub height: u32,
}

impl SizeSpec {
    /// Create a named entry for the predefined-size table.
    pub fn named(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: Some(name.into()),
            width,
            height,
        }
    }

    /// The "original size" sentinel.
    pub fn original() -> Self {
        Self {
            name: Some(ORIGINAL_SIZE_NAME.to_string()),
            width: 0,
            height: 0,
        }
    }

    pub fn is_original(&self) -> bool {
        self.name.as_deref() == Some(ORIGINAL_SIZE_NAME)
    }

    /// Whether this spec names a concrete target the pipeline can resize to.
    pub fn is_transformable(&self) -> bool {
        !self.is_original() && self.width > 0 && self.height > 0
    }

    /// Resolve a user-supplied size token against the predefined table.
    ///
    /// Table lookup is case-insensitive and wins over literal parsing. Tokens
    /// absent from the table fall back to [`SizeSpec::parse`].
    pub fn resolve(token: &str, table: &HashMap<String, SizeSpec>) -> SizeSpec {
        if let Some(spec) = table.get(&token.to_lowercase()) {
            return spec.clone();
        }
        Self::parse(token)
    }

    /// Parse a literal size token: `WIDTHxHEIGHT`, or a bare integer meaning
    /// a square. Malformed or empty tokens degrade to a 0x0 spec; parsing
    /// never fails.
    pub fn parse(token: &str) -> SizeSpec {
        let mut parts = token.splitn(2, ['x', 'X']);
        let width = to_dimension(parts.next().unwrap_or(""));
        match parts.next() {
            Some(rest) => SizeSpec {
                name: None,
                width,
                height: to_dimension(rest),
            },
            // Bare integer: a square.
            None => SizeSpec {
                name: None,
                width,
                height: width,
            },
        }
    }
}

fn to_dimension(s: &str) -> u32 {
    s.trim().parse().unwrap_or(0)
}
