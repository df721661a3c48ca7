use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use thiserror::Error;

use crate::error_codes;
use crate::types::RequestId;

/// JSON-RPC error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonRpcErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
    ServerError(i64), // -32099 to -32000
}

impl JsonRpcErrorCode {
    pub fn code(&self) -> i64 {
        match self {
            JsonRpcErrorCode::ParseError => error_codes::PARSE_ERROR,
            JsonRpcErrorCode::InvalidRequest => error_codes::INVALID_REQUEST,
            JsonRpcErrorCode::MethodNotFound => error_codes::METHOD_NOT_FOUND,
            JsonRpcErrorCode::InvalidParams => error_codes::INVALID_PARAMS,
            JsonRpcErrorCode::InternalError => error_codes::INTERNAL_ERROR,
            JsonRpcErrorCode::ServerError(code) => *code,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            JsonRpcErrorCode::ParseError => "Parse error",
            JsonRpcErrorCode::InvalidRequest => "Invalid Request",
            JsonRpcErrorCode::MethodNotFound => "Method not found",
            JsonRpcErrorCode::InvalidParams => "Invalid params",
            JsonRpcErrorCode::InternalError => "Internal error",
            JsonRpcErrorCode::ServerError(_) => "Server error",
        }
    }
}

impl fmt::Display for JsonRpcErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

/// The `error` member of an error response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcErrorObject {
    pub fn new(code: JsonRpcErrorCode, message: Option<String>, data: Option<Value>) -> Self {
        Self {
            code: code.code(),
            message: message.unwrap_or_else(|| code.message().to_string()),
            data,
        }
    }

    pub fn parse_error(data: Option<Value>) -> Self {
        Self::new(JsonRpcErrorCode::ParseError, None, data)
    }

    pub fn invalid_request(message: Option<String>) -> Self {
        Self::new(JsonRpcErrorCode::InvalidRequest, message, None)
    }

    pub fn method_not_found(message: String, data: Option<Value>) -> Self {
        Self::new(JsonRpcErrorCode::MethodNotFound, Some(message), data)
    }

    pub fn invalid_params(message: &str) -> Self {
        Self::new(
            JsonRpcErrorCode::InvalidParams,
            Some(message.to_string()),
            None,
        )
    }

    pub fn internal_error(message: Option<String>) -> Self {
        Self::new(JsonRpcErrorCode::InternalError, message, None)
    }
}

/// JSON-RPC error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    #[serde(rename = "jsonrpc")]
    pub version: crate::types::JsonRpcVersion,
    pub id: Option<RequestId>,
    pub error: JsonRpcErrorObject,
}

impl JsonRpcError {
    pub fn new(id: Option<RequestId>, error: JsonRpcErrorObject) -> Self {
        Self {
            version: crate::types::JsonRpcVersion::V2_0,
            id,
            error,
        }
    }
}

impl fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "JSON-RPC Error {}: {}",
            self.error.code, self.error.message
        )
    }
}

impl std::error::Error for JsonRpcError {}

/// Mismatch between the supplied arguments and a target's parameters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArityError {
    #[error("too many arguments: expected at most {expected}, got {given}")]
    TooMany { expected: usize, given: usize },

    #[error("too few arguments: expected at least {required}, got {given}")]
    TooFew { required: usize, given: usize },

    #[error("missing required argument '{name}'")]
    Missing { name: String },
}

/// A response tree could not be represented as JSON
#[derive(Debug, Error)]
#[error("response is not encodable: {0}")]
pub struct ResponseEncodingFailure(#[from] pub serde_json::Error);

/// Failure raised by the body of a procedure
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ProcedureError {
    pub code: i64,
    pub message: String,
    pub data: Option<Value>,
}

impl ProcedureError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: error_codes::INTERNAL_ERROR,
            message: message.into(),
            data: None,
        }
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self {
            code: error_codes::INVALID_PARAMS,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_code(mut self, code: i64) -> Self {
        self.code = code;
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Every way a call can fail inside the server core
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Procedure '{0}' not found")]
    ProcedureNotFound(String),

    #[error("Target '{target}' bound to procedure '{procedure}' not found")]
    TargetNotFound { procedure: String, target: String },

    #[error("Method '{method}' not found on target '{target}'")]
    MethodNotFound { target: String, method: String },

    #[error("Invalid arguments: {0}")]
    Arity(#[from] ArityError),

    #[error(transparent)]
    Encoding(#[from] ResponseEncodingFailure),

    #[error(transparent)]
    Procedure(#[from] ProcedureError),
}

/// Trait for errors that can be converted to JSON-RPC error objects
pub trait ToJsonRpcError: std::error::Error + Send + Sync + 'static {
    /// Convert this error to a JSON-RPC error object
    fn to_error_object(&self) -> JsonRpcErrorObject;
}

impl ToJsonRpcError for DispatchError {
    fn to_error_object(&self) -> JsonRpcErrorObject {
        match self {
            DispatchError::ProcedureNotFound(_) => {
                JsonRpcErrorObject::method_not_found(self.to_string(), None)
            }
            DispatchError::TargetNotFound { target, .. } => JsonRpcErrorObject::method_not_found(
                self.to_string(),
                Some(json!({"kind": "target_not_found", "target": target})),
            ),
            DispatchError::MethodNotFound { target, method } => {
                JsonRpcErrorObject::method_not_found(
                    self.to_string(),
                    Some(json!({"kind": "method_not_found", "target": target, "method": method})),
                )
            }
            DispatchError::Arity(e) => JsonRpcErrorObject::invalid_params(&e.to_string()),
            DispatchError::Encoding(e) => JsonRpcErrorObject::internal_error(Some(e.to_string())),
            DispatchError::Procedure(e) => JsonRpcErrorObject {
                code: e.code,
                message: e.message.clone(),
                data: e.data.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(JsonRpcErrorCode::ParseError.code(), -32700);
        assert_eq!(JsonRpcErrorCode::MethodNotFound.code(), -32601);
        assert_eq!(JsonRpcErrorCode::ServerError(-32050).code(), -32050);
    }

    #[test]
    fn test_lookup_failures_share_code_but_differ_in_data() {
        let procedure = DispatchError::ProcedureNotFound("missing".into()).to_error_object();
        let target = DispatchError::TargetNotFound {
            procedure: "p".into(),
            target: "Ghost".into(),
        }
        .to_error_object();
        let method = DispatchError::MethodNotFound {
            target: "Math".into(),
            method: "cube".into(),
        }
        .to_error_object();

        assert_eq!(procedure.code, -32601);
        assert_eq!(target.code, -32601);
        assert_eq!(method.code, -32601);
        assert!(procedure.data.is_none());
        assert_eq!(target.data.unwrap()["kind"], "target_not_found");
        assert_eq!(method.data.unwrap()["kind"], "method_not_found");
    }

    #[test]
    fn test_arity_maps_to_invalid_params() {
        let obj = DispatchError::from(ArityError::Missing { name: "p1".into() }).to_error_object();
        assert_eq!(obj.code, -32602);
        assert!(obj.message.contains("p1"));
    }

    #[test]
    fn test_procedure_error_keeps_code() {
        let err = ProcedureError::new("boom")
            .with_code(-32001)
            .with_data(serde_json::json!({"retry": false}));
        let obj = DispatchError::from(err).to_error_object();
        assert_eq!(obj.code, -32001);
        assert_eq!(obj.message, "boom");
        assert_eq!(obj.data, Some(serde_json::json!({"retry": false})));
    }

    #[test]
    fn test_error_serialization_skips_missing_data() {
        let error = JsonRpcError::new(
            Some(RequestId::Number(1)),
            JsonRpcErrorObject::invalid_params("bad"),
        );
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":-32602"));
        assert!(!json.contains("\"data\""));
    }
}
