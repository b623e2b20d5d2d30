//! Shared value types.
//!
//! These are the values that flow through the whole pipeline:
//! bundle files become [`Module`]s, instruction text becomes an [`Instruction`],
//! and a strategy turns both into an [`InvocationContext`] of [`ContentFrame`]s.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::adapter::ToolDefinition;

/// Module type whose content is wrapped in a fenced block when assembled.
pub const RESOURCE_TYPE: &str = "RESOURCE";

/// Operand type for untyped (bare or quoted) operands.
pub const ANY_TYPE: &str = "ANY";

/// Type assigned to modules that do not declare one.
pub const DEFAULT_MODULE_TYPE: &str = RESOURCE_TYPE;

/// Version assigned to modules that do not declare one.
pub const DEFAULT_MODULE_VERSION: &str = "1.0";

/// A uniquely identified piece of content loaded from a bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    /// Registry key, unique within a registry.
    pub id: String,

    pub version: String,

    /// OPERATOR, MODIFIER, RESOURCE, ...
    #[serde(rename = "type")]
    pub module_type: String,

    /// Verbatim file content.
    pub content: String,

    /// Decoded document fields. Opaque to the resolver.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, serde_json::Value>,

    /// Where the module was read from, if it came from disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_path: Option<PathBuf>,
}

impl Module {
    pub fn new(
        id: impl Into<String>,
        version: impl Into<String>,
        module_type: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
            module_type: module_type.into(),
            content: content.into(),
            metadata: serde_json::Map::new(),
            source_path: None,
        }
    }

    /// Attach decoded metadata.
    pub fn with_metadata(mut self, metadata: serde_json::Map<String, serde_json::Value>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Record the on-disk origin of this module.
    pub fn with_source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    /// Whether this module is a raw resource (fenced when assembled).
    pub fn is_resource(&self) -> bool {
        self.module_type == RESOURCE_TYPE
    }
}

/// A typed or untyped operand payload, e.g. `PromptModule('sys/ops/write')`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub value: String,
}

impl Entity {
    /// An untyped operand (`'Topic'` or `Topic`).
    pub fn any(value: impl Into<String>) -> Self {
        Self {
            entity_type: ANY_TYPE.into(),
            value: value.into(),
        }
    }

    /// A typed operand (`Type('value')`).
    pub fn typed(entity_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            value: value.into(),
        }
    }

    pub fn is_any(&self) -> bool {
        self.entity_type == ANY_TYPE
    }

    /// Textual form used in assembled output: the bare value for untyped
    /// operands, constructor syntax otherwise.
    pub fn render(&self) -> String {
        if self.is_any() {
            self.value.clone()
        } else {
            format!("{}('{}')", self.entity_type, self.value)
        }
    }
}

/// A reference in a FROM / USING / OPTIMIZING_FOR list, e.g. `Lens('tone')`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    /// Module id or alias name.
    pub id: String,

    /// Explicit type, if the reference was written as `Type('id')`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
}

impl ResourceRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            resource_type: None,
        }
    }

    pub fn typed(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            resource_type: Some(resource_type.into()),
        }
    }
}

/// A parsed instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    /// Operator id, e.g. `WRITE` or `sys/ops/write`.
    pub action: String,

    /// The object being operated on.
    pub operand: Entity,

    /// FROM ...
    #[serde(default)]
    pub sources: Vec<ResourceRef>,

    /// USING ...
    #[serde(default)]
    pub modifiers: Vec<ResourceRef>,

    /// OPTIMIZING_FOR ...
    #[serde(default)]
    pub goals: Vec<ResourceRef>,

    /// The verbatim instruction text, kept for audit.
    #[serde(default)]
    pub original_text: String,
}

impl Instruction {
    /// An instruction with no clauses.
    pub fn new(action: impl Into<String>, operand: Entity) -> Self {
        Self {
            action: action.into(),
            operand,
            sources: Vec::new(),
            modifiers: Vec::new(),
            goals: Vec::new(),
            original_text: String::new(),
        }
    }
}

/// One unit of assembled output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentFrame {
    Text {
        content: String,
    },
    Blob {
        mime_type: String,
        #[serde(with = "base64_bytes")]
        data: Vec<u8>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        uri: Option<String>,
    },
}

impl ContentFrame {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    /// The text payload, if this is a text frame.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { content } => Some(content),
            Self::Blob { .. } => None,
        }
    }
}

/// The output of assembly, handed to a generation adapter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvocationContext {
    pub frames: Vec<ContentFrame>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
}

impl InvocationContext {
    pub fn new(frames: Vec<ContentFrame>) -> Self {
        Self {
            frames,
            tools: Vec::new(),
        }
    }

    /// Iterate over the text payloads, skipping blobs.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.frames.iter().filter_map(ContentFrame::as_text)
    }
}

mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untyped_operand_renders_bare() {
        assert_eq!(Entity::any("Topic").render(), "Topic");
    }

    #[test]
    fn typed_operand_renders_constructor() {
        let entity = Entity::typed("PromptModule", "sys/ops/write");
        assert_eq!(entity.render(), "PromptModule('sys/ops/write')");
        assert!(!entity.is_any());
    }

    #[test]
    fn module_serializes_type_field() {
        let module = Module::new("sys/ops/write", "1.0", "OPERATOR", "Write.");
        let json = serde_json::to_value(&module).unwrap();
        assert_eq!(json["type"], "OPERATOR");
        assert!(json.get("metadata").is_none());
        assert!(!module.is_resource());
    }

    #[test]
    fn blob_frame_serializes_as_base64() {
        let frame = ContentFrame::Blob {
            mime_type: "image/png".into(),
            data: vec![0x89, 0x50, 0x4e, 0x47],
            uri: None,
        };
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["kind"], "blob");
        assert_eq!(json["data"], "iVBORw==");

        let back: ContentFrame = serde_json::from_value(json).unwrap();
        assert_eq!(back, frame);
    }

    #[test]
    fn context_texts_skip_blobs() {
        let ctx = InvocationContext::new(vec![
            ContentFrame::text("a"),
            ContentFrame::Blob {
                mime_type: "image/png".into(),
                data: vec![],
                uri: Some("gs://bucket/img.png".into()),
            },
            ContentFrame::text("b"),
        ]);
        assert_eq!(ctx.texts().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
