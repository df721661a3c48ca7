//! Translation of wire-level failures into [`RpcClientError`]s

use tandem_json_rpc_server::JsonRpcErrorObject;
use tandem_json_rpc_server::error_codes::{
    INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR,
};
use tracing::debug;

use crate::error::{RpcClientError, RpcClientResult};
use crate::response::Reply;

/// Maps server-reported JSON-RPC errors onto the client taxonomy
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorTranslator {
    suppress_errors: bool,
}

impl ErrorTranslator {
    pub fn new(suppress_errors: bool) -> Self {
        Self { suppress_errors }
    }

    pub fn suppresses_errors(&self) -> bool {
        self.suppress_errors
    }

    /// Fixed code → kind mapping
    pub fn classify(error: JsonRpcErrorObject) -> RpcClientError {
        let JsonRpcErrorObject {
            code,
            message,
            data,
        } = error;
        match code {
            PARSE_ERROR => RpcClientError::Parse { message, data },
            INVALID_REQUEST => RpcClientError::InvalidRequest { message, data },
            METHOD_NOT_FOUND => RpcClientError::ProcedureNotFound { message, data },
            INVALID_PARAMS => RpcClientError::InvalidArguments { message, data },
            code => RpcClientError::Response {
                code,
                message,
                data,
            },
        }
    }

    /// Fail with the translated error, or hand it back as a value when errors are suppressed
    pub fn translate(&self, error: JsonRpcErrorObject) -> RpcClientResult<Reply> {
        self.surface(Self::classify(error))
    }

    /// Apply the suppression setting to an already classified error
    pub fn surface(&self, error: RpcClientError) -> RpcClientResult<Reply> {
        if self.suppress_errors {
            debug!(error = %error, "Returning suppressed error");
            Ok(Reply::Error(error))
        } else {
            Err(error)
        }
    }
}

/// Maps HTTP status codes onto transport-level errors
pub struct HttpErrorHandler;

impl HttpErrorHandler {
    /// 401/403 deny access, 404 means the endpoint is unreachable, 500 is a server failure.
    /// Other codes are left for the response parser.
    pub fn check(status: u16) -> RpcClientResult<()> {
        match status {
            401 | 403 => Err(RpcClientError::AccessDenied(format!("HTTP {}", status))),
            404 => Err(RpcClientError::ConnectionFailure(format!(
                "HTTP {}: endpoint not found",
                status
            ))),
            500 => Err(RpcClientError::Server(format!(
                "HTTP {}: internal server error",
                status
            ))),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(code: i64, message: &str) -> JsonRpcErrorObject {
        JsonRpcErrorObject {
            code,
            message: message.to_string(),
            data: None,
        }
    }

    #[test]
    fn test_standard_codes() {
        assert!(matches!(
            ErrorTranslator::classify(object(-32700, "p")),
            RpcClientError::Parse { .. }
        ));
        assert!(matches!(
            ErrorTranslator::classify(object(-32600, "r")),
            RpcClientError::InvalidRequest { .. }
        ));
        assert!(matches!(
            ErrorTranslator::classify(object(-32602, "a")),
            RpcClientError::InvalidArguments { .. }
        ));
    }

    #[test]
    fn test_method_not_found_carries_message() {
        let err = ErrorTranslator::new(false)
            .translate(object(-32601, "x"))
            .unwrap_err();
        match &err {
            RpcClientError::ProcedureNotFound { message, .. } => assert_eq!(message, "x"),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(err.to_string().contains('x'));
    }

    #[test]
    fn test_unknown_code_is_generic() {
        let mut error = object(-1, "custom failure");
        error.data = Some(json!([1, 2]));
        match ErrorTranslator::classify(error) {
            RpcClientError::Response {
                code,
                message,
                data,
            } => {
                assert_eq!(code, -1);
                assert_eq!(message, "custom failure");
                assert_eq!(data, Some(json!([1, 2])));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_suppressed_errors_are_returned() {
        let reply = ErrorTranslator::new(true)
            .translate(object(-32601, "gone"))
            .unwrap();
        assert!(matches!(
            reply,
            Reply::Error(RpcClientError::ProcedureNotFound { .. })
        ));
    }

    #[test]
    fn test_http_status_mapping() {
        assert!(matches!(
            HttpErrorHandler::check(401),
            Err(RpcClientError::AccessDenied(_))
        ));
        assert!(matches!(
            HttpErrorHandler::check(403),
            Err(RpcClientError::AccessDenied(_))
        ));
        assert!(matches!(
            HttpErrorHandler::check(404),
            Err(RpcClientError::ConnectionFailure(_))
        ));
        assert!(matches!(
            HttpErrorHandler::check(500),
            Err(RpcClientError::Server(_))
        ));
        assert!(HttpErrorHandler::check(200).is_ok());
        assert!(HttpErrorHandler::check(502).is_ok());
    }
}
