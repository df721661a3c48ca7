//! # JSON-RPC 2.0 Server Core
//!
//! A transport-agnostic JSON-RPC 2.0 server core. Procedures are registered by
//! name, arguments are bound against an explicit parameter signature, and
//! responses are encoded back to wire bytes.
//!
//! ## Features
//! - Positional and named calling conventions with parameter defaults
//! - Plain functions, class-style method tables and instance method bindings
//! - Batch requests and notifications
//! - Distinct failure kinds for unknown procedures, targets, methods and arity mismatches
//!
//! ```rust
//! use serde_json::json;
//! use tandem_json_rpc_server::prelude::*;
//!
//! let mut registry = ProcedureRegistry::new();
//! registry.register(
//!     "add",
//!     FnProcedure::new(Signature::new().required("a").optional("b", json!(1)), |args| {
//!         Ok(args.get::<i64>(0)? + args.get::<i64>(1)?)
//!     }),
//! );
//!
//! let dispatcher = Dispatcher::new(registry);
//! let value = dispatcher
//!     .execute_procedure("add", Arguments::Positional(vec![json!(41)]))
//!     .unwrap();
//! assert_eq!(value, json!(42));
//! ```

pub mod binder;
pub mod dispatch;
pub mod encode;
pub mod error;
pub mod notification;
pub mod prelude;
pub mod procedure;
pub mod registry;
pub mod request;
pub mod response;
pub mod types;

// Re-export main types
pub use binder::{Arguments, ParameterSpec, Signature, bind_arguments, is_positional_arguments};
pub use dispatch::Dispatcher;
pub use encode::{WireText, encode, encode_batch, encode_message};
pub use error::{
    ArityError, DispatchError, JsonRpcError, JsonRpcErrorCode, JsonRpcErrorObject, ProcedureError,
    ResponseEncodingFailure, ToJsonRpcError,
};
pub use notification::JsonRpcNotification;
pub use procedure::{BoundArguments, FnProcedure, MethodTable, Procedure, RpcObject};
pub use registry::{ProcedureBinding, ProcedureRegistry, ProcedureTarget};
pub use request::{JsonRpcRequest, RequestParams};
pub use response::{JsonRpcMessage, JsonRpcResponse};
pub use types::{JsonRpcVersion, RequestId};

/// JSON-RPC 2.0 version constant
pub const JSONRPC_VERSION: &str = "2.0";

/// Standard JSON-RPC 2.0 error codes
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
}
