use serde::{Serialize, Serializer};

use crate::error::ResponseEncodingFailure;
use crate::response::JsonRpcMessage;

/// Bytes that must travel as a JSON string.
///
/// Serialization fails when the bytes are not valid UTF-8; no replacement
/// characters are substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireText(pub Vec<u8>);

impl Serialize for WireText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let text = std::str::from_utf8(&self.0).map_err(|e| {
            serde::ser::Error::custom(format!("byte sequence is not valid text: {}", e))
        })?;
        serializer.serialize_str(text)
    }
}

impl From<&str> for WireText {
    fn from(s: &str) -> Self {
        WireText(s.as_bytes().to_vec())
    }
}

/// Serialize any response tree to wire bytes
pub fn encode<T: Serialize + ?Sized>(payload: &T) -> Result<Vec<u8>, ResponseEncodingFailure> {
    Ok(serde_json::to_vec(payload)?)
}

pub fn encode_message(message: &JsonRpcMessage) -> Result<Vec<u8>, ResponseEncodingFailure> {
    encode(message)
}

/// Encode batch responses as one top-level array
pub fn encode_batch(messages: &[JsonRpcMessage]) -> Result<Vec<u8>, ResponseEncodingFailure> {
    encode(messages)
}
