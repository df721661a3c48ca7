//! Transport layer for the JSON-RPC client
//!
//! The client core hands fully encoded bytes and a header list to a
//! [`Transport`] and gets back the raw response. Opening connections, TLS and
//! redirects are the transport's business.

use async_trait::async_trait;

use crate::error::RpcClientResult;

pub mod http;

pub use http::HttpTransport;

/// Ordered header list; names may repeat
pub type HeaderList = Vec<(String, String)>;

/// Raw response of one exchange
#[derive(Debug, Clone, Default)]
pub struct TransportResponse {
    /// HTTP-style status code
    pub status: u16,
    /// Response headers in arrival order
    pub headers: HeaderList,
    /// Response body
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn ok(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Header pairs as string slices
    pub fn header_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

/// Transport statistics for monitoring
#[derive(Debug, Clone, Default)]
pub struct TransportStatistics {
    /// Number of exchanges attempted
    pub requests_sent: u64,
    /// Number of responses received
    pub responses_received: u64,
    /// Number of errors encountered
    pub errors: u64,
    /// Last error message
    pub last_error: Option<String>,
}

/// One request/response exchange with the server
#[async_trait]
pub trait Transport: Send + Sync {
    /// Where requests go
    fn endpoint(&self) -> &str;

    /// Send `body` with `headers` and wait for the response
    async fn send(&self, body: Vec<u8>, headers: HeaderList) -> RpcClientResult<TransportResponse>;

    /// Get transport statistics
    fn statistics(&self) -> TransportStatistics {
        TransportStatistics::default()
    }
}

/// Type alias for a boxed transport
pub type BoxedTransport = Box<dyn Transport>;
