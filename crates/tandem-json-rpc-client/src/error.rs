//! Error types for JSON-RPC client operations

use serde_json::Value;
use thiserror::Error;

/// Result type for client operations
pub type RpcClientResult<T> = Result<T, RpcClientError>;

/// Every failure a caller can observe, one variant per distinguishable kind
#[derive(Error, Debug)]
pub enum RpcClientError {
    /// Server reported -32700
    #[error("Parse error: {message}")]
    Parse { message: String, data: Option<Value> },

    /// Server reported -32600
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String, data: Option<Value> },

    /// Server reported -32601
    #[error("Procedure not found: {message}")]
    ProcedureNotFound { message: String, data: Option<Value> },

    /// Server reported -32602
    #[error("Invalid arguments: {message}")]
    InvalidArguments { message: String, data: Option<Value> },

    /// Any other server-reported code
    #[error("Server returned error (code {code}): {message}")]
    Response {
        code: i64,
        message: String,
        data: Option<Value>,
    },

    /// Target unreachable, malformed address, or HTTP 404
    #[error("Connection failure: {0}")]
    ConnectionFailure(String),

    /// HTTP 401 or 403
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// HTTP 500
    #[error("Server failure: {0}")]
    Server(String),

    /// The transport failed after a connection was established
    #[error("Transport error: {0}")]
    Transport(String),

    /// The payload was not a JSON-RPC response
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON encoding or decoding errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RpcClientError {
    /// JSON-RPC error code, when the server reported one
    pub fn error_code(&self) -> Option<i64> {
        use tandem_json_rpc_server::error_codes::*;

        match self {
            Self::Parse { .. } => Some(PARSE_ERROR),
            Self::InvalidRequest { .. } => Some(INVALID_REQUEST),
            Self::ProcedureNotFound { .. } => Some(METHOD_NOT_FOUND),
            Self::InvalidArguments { .. } => Some(INVALID_PARAMS),
            Self::Response { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// `data` member of a server-reported error
    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Parse { data, .. }
            | Self::InvalidRequest { data, .. }
            | Self::ProcedureNotFound { data, .. }
            | Self::InvalidArguments { data, .. }
            | Self::Response { data, .. } => data.as_ref(),
            _ => None,
        }
    }

    /// True for errors that came back inside a JSON-RPC error response
    pub fn is_server_reported(&self) -> bool {
        self.error_code().is_some()
    }

    /// True for errors derived from the transport or HTTP status
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailure(_)
                | Self::AccessDenied(_)
                | Self::Server(_)
                | Self::Transport(_)
        )
    }
}

impl From<reqwest::Error> for RpcClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() {
            Self::ConnectionFailure(e.to_string())
        } else if e.is_timeout() {
            Self::Transport(format!("request timed out: {}", e))
        } else {
            Self::Transport(e.to_string())
        }
    }
}
