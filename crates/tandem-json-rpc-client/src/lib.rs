//! # JSON-RPC 2.0 Client
//!
//! An async JSON-RPC 2.0 client. Calls are encoded into request envelopes,
//! exchanged over a [`Transport`] and decoded back into a [`Reply`].
//!
//! ## Features
//!
//! - **Batching**: queue calls with [`RpcClient::batch`] and flush them with [`RpcClient::send`]
//! - **Error translation**: server error codes become distinct [`RpcClientError`] variants,
//!   raised or handed back as values depending on configuration
//! - **Session continuity**: cookies set by the server are replayed on later requests
//! - **HTTP status mapping**: 401/403, 404 and 500 surface as transport errors
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use serde_json::json;
//! use tandem_json_rpc_client::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RpcClient::http("http://localhost:8080/rpc", ClientConfig::default())?;
//!
//!     let sum = client
//!         .call_value("add", Some(RequestParams::Array(vec![json!(1), json!(2)])))
//!         .await?;
//!     println!("1 + 2 = {}", sum);
//!
//!     client.batch();
//!     client.call("ping", None).await?;
//!     client.call("time", None).await?;
//!     let replies = client.send().await?;
//!     println!("Batch replies: {:?}", replies);
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod prelude;
pub mod request;
pub mod response;
pub mod session;
pub mod translate;
pub mod transport;

// Re-export main types
pub use client::RpcClient;
pub use config::{BasicCredentials, ClientConfig, ConnectionConfig, TimeoutConfig};
pub use error::{RpcClientError, RpcClientResult};
pub use request::RequestBuilder;
pub use response::{Reply, ResponseParser};
pub use session::CookieJar;
pub use translate::{ErrorTranslator, HttpErrorHandler};
pub use transport::{HttpTransport, Transport, TransportResponse, TransportStatistics};

// Wire types shared with the server core
pub use tandem_json_rpc_server::{RequestId, RequestParams};
