//! Structured scalar-map resources.
//!
//! An alternative to the legacy text format: a single JSON object whose
//! values are scalars. The loader is not pre-seeded; callers register it
//! explicitly, which also places the `json` identifier ahead of the
//! built-in `properties` identifier in acquisition order.

use serde_json::Value;

use crate::error::DecodeError;
use crate::store::ResourceMap;

use super::FormatLoader;

/// Loader for flat JSON object resources.
///
/// Booleans and numbers are stored in their canonical text rendering;
/// nulls, arrays, and nested objects are rejected as malformed, since a
/// resource store is a flat string map, not a document tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonResourceLoader;

impl JsonResourceLoader {
    /// The filename extension this loader serves.
    pub const EXTENSION: &'static str = "json";
}

impl FormatLoader for JsonResourceLoader {
    fn extensions(&self) -> Vec<String> {
        vec![Self::EXTENSION.to_string()]
    }

    fn load(&self, bytes: &[u8]) -> Result<ResourceMap, DecodeError> {
        let document: Value =
            serde_json::from_slice(bytes).map_err(|err| DecodeError::Structured {
                reason: err.to_string(),
            })?;
        let Value::Object(object) = document else {
            return Err(DecodeError::Structured {
                reason: format!("expected a top-level object, found {}", kind(&document)),
            });
        };
        let mut map = ResourceMap::new();
        for (key, value) in object {
            let rendered = match value {
                Value::String(text) => text,
                Value::Bool(flag) => flag.to_string(),
                Value::Number(number) => number.to_string(),
                other => {
                    return Err(DecodeError::Structured {
                        reason: format!("non-scalar value for key '{key}': {}", kind(&other)),
                    });
                }
            };
            map.insert(key, rendered);
        }
        Ok(map)
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
