//! Structured document decoding for bundle files.
//!
//! A decoder turns raw file text into a generic key-value map. Failure is
//! never fatal to loading; the loader falls back to a path-based module id.

use serde_json::{Map, Value};

/// Errors decoding a document.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("document is not a mapping")]
    NotAMapping,

    #[error("document cannot be represented as a string-keyed map: {0}")]
    Convert(#[from] serde_json::Error),
}

/// Decodes raw text into a key-value map.
pub trait DocumentDecoder {
    /// Whether files at this bundle-relative path should be decoded at all.
    fn accepts(&self, relative_path: &str) -> bool;

    fn decode(&self, text: &str) -> Result<Map<String, Value>, DecodeError>;
}

/// Decodes `.yaml` / `.yml` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlDecoder;

impl DocumentDecoder for YamlDecoder {
    fn accepts(&self, relative_path: &str) -> bool {
        let lower = relative_path.to_ascii_lowercase();
        lower.ends_with(".yaml") || lower.ends_with(".yml")
    }

    fn decode(&self, text: &str) -> Result<Map<String, Value>, DecodeError> {
        let doc: serde_yaml::Value = serde_yaml::from_str(text)?;
        if !doc.is_mapping() {
            return Err(DecodeError::NotAMapping);
        }
        match serde_json::to_value(&doc)? {
            Value::Object(map) => Ok(map),
            _ => Err(DecodeError::NotAMapping),
        }
    }
}

/// Stringify a scalar field (`version: 1.0` → `"1.0"`). Null, empty strings
/// and compound values yield `None`.
pub fn scalar_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
