//! # Client Prelude
//!
//! Convenient re-exports of the most commonly used client types.
//!
//! ```rust
//! use tandem_json_rpc_client::prelude::*;
//! ```

// Core client types
pub use crate::client::RpcClient;
pub use crate::config::{ClientConfig, TimeoutConfig};
pub use crate::error::{RpcClientError, RpcClientResult};
pub use crate::response::Reply;

// Transport types
pub use crate::transport::{HttpTransport, Transport, TransportResponse};

// Wire types
pub use tandem_json_rpc_server::{RequestId, RequestParams};

pub use std::time::Duration;
