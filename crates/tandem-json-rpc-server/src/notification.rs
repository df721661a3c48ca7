use serde::{Deserialize, Serialize};

use crate::binder::Arguments;
use crate::request::RequestParams;
use crate::types::JsonRpcVersion;

/// A JSON-RPC notification (request without an id). Never answered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcNotification {
    #[serde(rename = "jsonrpc")]
    pub version: JsonRpcVersion,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<RequestParams>,
}

impl JsonRpcNotification {
    pub fn new(method: impl Into<String>, params: Option<RequestParams>) -> Self {
        Self {
            version: JsonRpcVersion::V2_0,
            method: method.into(),
            params: params.and_then(RequestParams::non_empty),
        }
    }

    pub fn arguments(&self) -> Arguments {
        self.params
            .clone()
            .map(RequestParams::into_arguments)
            .unwrap_or_else(Arguments::none)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_string};

    #[test]
    fn test_notification_json_format() {
        let notification = JsonRpcNotification::new("ping", None);
        let json_str = to_string(&notification).unwrap();

        // Should not contain an "id" field
        assert!(!json_str.contains("\"id\""));
        assert!(!json_str.contains("\"params\""));
        assert!(json_str.contains("\"jsonrpc\":\"2.0\""));
        assert!(json_str.contains("\"method\":\"ping\""));
    }

    #[test]
    fn test_notification_arguments() {
        let notification =
            JsonRpcNotification::new("log", Some(RequestParams::Array(vec![json!("hello")])));
        assert_eq!(
            notification.arguments(),
            Arguments::Positional(vec![json!("hello")])
        );
    }
}
