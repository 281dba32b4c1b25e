//! Structured content: JSON and YAML documents
//!
//! Request payloads and response bodies are structured documents. This module
//! knows which content types the client speaks, renders maps and values into
//! payload bytes, and parses payloads back into maps.

use crate::{EsClientError, Result};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Content type used when the client renders queries and request sources
pub const CONTENT_TYPE: ContentType = ContentType::Json;

/// Content type used when the client renders documents for indexing
pub const INDEX_CONTENT_TYPE: ContentType = ContentType::Json;

/// Encodings a structured document can be rendered in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    Json,
    Yaml,
}

impl ContentType {
    /// HTTP media type for this encoding
    pub fn media_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json; charset=UTF-8",
            Self::Yaml => "application/yaml",
        }
    }

    /// Short name used in configuration and query parameters
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }

    /// Guess the encoding of `data` from its first significant bytes
    pub fn detect(data: &[u8]) -> Option<ContentType> {
        let start = data.iter().position(|b| !b.is_ascii_whitespace())?;
        let data = &data[start..];
        if data.starts_with(b"---") {
            return Some(Self::Yaml);
        }
        match data[0] {
            b'{' | b'[' => Some(Self::Json),
            _ => None,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Renders a structured value into payload bytes of a given content type
#[derive(Debug, Clone)]
pub struct XContentBuilder {
    content_type: ContentType,
    value: Value,
}

impl XContentBuilder {
    /// Start an empty object document
    pub fn new(content_type: ContentType) -> Self {
        Self {
            content_type,
            value: Value::Object(Map::new()),
        }
    }

    /// Start a JSON document
    pub fn json() -> Self {
        Self::new(ContentType::Json)
    }

    /// Replace the document with `map`
    pub fn map(mut self, map: &Map<String, Value>) -> Self {
        self.value = Value::Object(map.clone());
        self
    }

    /// Replace the document with an arbitrary value
    pub fn value(mut self, value: Value) -> Self {
        self.value = value;
        self
    }

    /// Set one top-level field, turning the document into an object if needed
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        if !self.value.is_object() {
            self.value = Value::Object(Map::new());
        }
        if let Value::Object(map) = &mut self.value {
            map.insert(name.into(), value.into());
        }
        self
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    /// Render the document
    pub fn bytes(&self) -> Result<Bytes> {
        let rendered = match self.content_type {
            ContentType::Json => serde_json::to_vec(&self.value)?,
            ContentType::Yaml => {
                let mut yaml = serde_yaml_ng::to_string(&self.value)?;
                // the document marker is what makes YAML detectable
                if !yaml.starts_with("---") {
                    yaml.insert_str(0, "---\n");
                }
                yaml.into_bytes()
            }
        };
        Ok(Bytes::from(rendered))
    }
}

/// Parse `data` into a map, detecting its content type
///
/// Fails with a decoding error when the data is empty, cannot be parsed, or is
/// not an object at the top level.
pub fn convert_to_map(data: &[u8]) -> Result<(ContentType, Map<String, Value>)> {
    let content_type = ContentType::detect(data).unwrap_or_default();
    let value = parse_value(data, content_type)?;
    match value {
        Value::Object(map) => Ok((content_type, map)),
        other => Err(EsClientError::decode(format!(
            "expected an object document, found {}",
            value_kind(&other)
        ))),
    }
}

/// Re-render `data` as JSON text
pub fn convert_to_json(data: &[u8], pretty: bool) -> Result<String> {
    let content_type = ContentType::detect(data).unwrap_or_default();
    let value = parse_value(data, content_type)?;
    let json = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    Ok(json)
}

fn parse_value(data: &[u8], content_type: ContentType) -> Result<Value> {
    if data.iter().all(u8::is_ascii_whitespace) {
        return Err(EsClientError::decode("empty document"));
    }
    match content_type {
        ContentType::Json => serde_json::from_slice(data)
            .map_err(|e| EsClientError::decode(format!("malformed JSON document: {e}"))),
        ContentType::Yaml => std::str::from_utf8(data)
            .map_err(|e| EsClientError::decode(format!("YAML document is not UTF-8: {e}")))
            .and_then(|text| {
                serde_yaml_ng::from_str(text)
                    .map_err(|e| EsClientError::decode(format!("malformed YAML document: {e}")))
            }),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detect() {
        assert_eq!(ContentType::detect(b"  {\"a\":1}"), Some(ContentType::Json));
        assert_eq!(ContentType::detect(b"---\na: 1\n"), Some(ContentType::Yaml));
        assert_eq!(ContentType::detect(b"   "), None);
        assert_eq!(ContentType::detect(b"plain"), None);
    }

    #[test]
    fn test_builder_renders_map_as_json() {
        let mut map = Map::new();
        map.insert("match_all".to_string(), json!({}));

        let bytes = XContentBuilder::json().map(&map).bytes().unwrap();
        assert_eq!(bytes.as_ref(), br#"{"match_all":{}}"#);
    }

    #[test]
    fn test_builder_renders_yaml_that_parses_back() {
        let bytes = XContentBuilder::new(ContentType::Yaml)
            .field("term", json!({"user": "kimchy"}))
            .bytes()
            .unwrap();

        let (content_type, map) = convert_to_map(&bytes).unwrap();
        assert_eq!(content_type, ContentType::Yaml);
        assert_eq!(map["term"]["user"], "kimchy");
    }

    #[test]
    fn test_convert_to_map_rejects_malformed_and_non_objects() {
        assert!(matches!(
            convert_to_map(b"{\"ok\":"),
            Err(EsClientError::Decode { .. })
        ));
        assert!(convert_to_map(b"[1,2]").is_err());
        assert!(convert_to_map(b"").is_err());
    }

    #[test]
    fn test_convert_to_json() {
        let json = convert_to_json(b"{ \"a\" : [1, 2] }", false).unwrap();
        assert_eq!(json, r#"{"a":[1,2]}"#);
    }
}
