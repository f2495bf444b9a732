//! # Text Fields
//!
//! A [`Text`] field always deserializes to [`Value::Text`]. Byte strings are
//! decoded with the configured [`Encoding`], text passes through, and other
//! scalars are rendered with their display form. Containers are rejected.
//!
//! Serialization renders the same way and, when configured with
//! [`Text::bytes_output`], encodes the result back to bytes.

use objective_core::{Environment, FieldKind, Invalid, Node, Value};

/// Character encoding used for byte strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Utf8,
    Latin1,
    Ascii,
}

impl Encoding {
    pub fn label(self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Latin1 => "latin-1",
            Encoding::Ascii => "ascii",
        }
    }

    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Encoding::Utf8 => String::from_utf8(bytes.to_vec()).ok(),
            Encoding::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
            Encoding::Ascii => bytes
                .is_ascii()
                .then(|| bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }

    pub fn encode(self, text: &str) -> Option<Vec<u8>> {
        match self {
            Encoding::Utf8 => Some(text.as_bytes().to_vec()),
            Encoding::Latin1 => text.chars().map(|c| u8::try_from(u32::from(c)).ok()).collect(),
            Encoding::Ascii => text.is_ascii().then(|| text.as_bytes().to_vec()),
        }
    }
}

/// Field kind producing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Text {
    pub encoding: Encoding,
    /// Serialize to encoded bytes instead of text.
    pub bytes_output: bool,
}

impl Text {
    pub fn new(encoding: Encoding) -> Self {
        Self {
            encoding,
            bytes_output: false,
        }
    }

    pub fn bytes_output(mut self) -> Self {
        self.bytes_output = true;
        self
    }

    fn to_text(&self, node: &Node, value: Value) -> Result<String, Invalid> {
        match value {
            Value::Text(text) => Ok(text),
            Value::Bytes(bytes) => match self.encoding.decode(&bytes) {
                Some(text) => Ok(text),
                None => {
                    let message = format!(
                        "Cannot decode `{}` as {}",
                        node.display_name(),
                        self.encoding.label()
                    );
                    Err(Invalid::value(node, Value::Bytes(bytes)).with_message(message))
                }
            },
            other if other.is_mapping() || other.is_sequence() => {
                let message = format!(
                    "Expected text for `{}`, got {}",
                    node.display_name(),
                    other.type_name()
                );
                Err(Invalid::value(node, other).with_message(message))
            }
            other => Ok(other.to_string()),
        }
    }
}

impl FieldKind for Text {
    fn kind_name(&self) -> &'static str {
        "Text"
    }

    fn deserialize(&self, node: &Node, value: Value, _env: &Environment) -> Result<Value, Invalid> {
        self.to_text(node, value).map(Value::Text)
    }

    fn serialize(&self, node: &Node, value: Value, _env: &Environment) -> Result<Value, Invalid> {
        let text = self.to_text(node, value)?;
        if !self.bytes_output {
            return Ok(Value::Text(text));
        }
        match self.encoding.encode(&text) {
            Some(bytes) => Ok(Value::Bytes(bytes)),
            None => {
                let message = format!(
                    "Cannot encode `{}` as {}",
                    node.display_name(),
                    self.encoding.label()
                );
                Err(Invalid::value(node, Value::Text(text)).with_message(message))
            }
        }
    }
}
