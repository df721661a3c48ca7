//! # JSON-RPC Server Prelude
//!
//! Convenient re-exports of the most commonly used types.
//!
//! ```rust
//! use tandem_json_rpc_server::prelude::*;
//! ```

pub use crate::binder::{Arguments, ParameterSpec, Signature};
pub use crate::dispatch::Dispatcher;
pub use crate::encode::WireText;
pub use crate::error::{ArityError, DispatchError, ProcedureError, ResponseEncodingFailure};
pub use crate::procedure::{BoundArguments, FnProcedure, MethodTable, Procedure, RpcObject};
pub use crate::registry::ProcedureRegistry;
pub use crate::request::{JsonRpcRequest, RequestParams};
pub use crate::response::JsonRpcMessage;
pub use crate::types::RequestId;

// Standard error codes
pub use crate::error_codes::*;
