//! Main JSON-RPC client implementation

use parking_lot::Mutex;
use serde_json::Value;
use std::collections::BTreeMap;
use tandem_json_rpc_server::RequestParams;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::error::{RpcClientError, RpcClientResult};
use crate::request::RequestBuilder;
use crate::response::{Reply, ResponseParser};
use crate::session::CookieJar;
use crate::transport::{BoxedTransport, HeaderList, HttpTransport};
use crate::translate::{ErrorTranslator, HttpErrorHandler};

/// JSON-RPC 2.0 client.
///
/// One call is fully sent and parsed before the next starts. Cookies set by
/// the server are replayed on every later request of the same client.
pub struct RpcClient {
    /// Transport layer
    transport: BoxedTransport,
    /// Configuration
    config: ClientConfig,
    /// Response decoding and error translation
    parser: ResponseParser,
    /// Batch buffer
    requests: Mutex<RequestBuilder>,
    /// Session cookies
    cookies: Mutex<CookieJar>,
}

impl RpcClient {
    /// Create a new client with the given transport
    pub fn new(transport: BoxedTransport, config: ClientConfig) -> Self {
        let parser = ResponseParser::new(ErrorTranslator::new(config.suppress_errors));
        Self {
            transport,
            config,
            parser,
            requests: Mutex::new(RequestBuilder::new()),
            cookies: Mutex::new(CookieJar::new()),
        }
    }

    /// Create a client talking HTTP to `endpoint`
    pub fn http(endpoint: &str, config: ClientConfig) -> RpcClientResult<Self> {
        let transport = HttpTransport::new(endpoint, &config)?;
        Ok(Self::new(Box::new(transport), config))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn endpoint(&self) -> &str {
        self.transport.endpoint()
    }

    /// Call `method`. While a batch is open the request is only queued.
    pub async fn call(
        &self,
        method: &str,
        params: Option<RequestParams>,
    ) -> RpcClientResult<Reply> {
        let request = RequestBuilder::prepare_request(method, params);
        let queued = self.requests.lock().enqueue(request);
        let request = match queued {
            Ok(id) => return Ok(Reply::Queued(id)),
            Err(request) => request,
        };

        debug!(method = %request.method, id = %request.id, "Calling procedure");
        let body = serde_json::to_vec(&request)?;
        match self.exchange(body).await? {
            Some(payload) => self.parser.parse_response(payload),
            None => Err(RpcClientError::InvalidResponse(format!(
                "empty response to request {}",
                request.id
            ))),
        }
    }

    /// Call `method` and return its result, failing on any error
    pub async fn call_value(
        &self,
        method: &str,
        params: Option<RequestParams>,
    ) -> RpcClientResult<Value> {
        self.call(method, params).await?.into_value()
    }

    /// Send a notification. Whatever the server answers is ignored.
    pub async fn notify(&self, method: &str, params: Option<RequestParams>) -> RpcClientResult<()> {
        let notification = RequestBuilder::prepare_notification(method, params);
        debug!(method = %notification.method, "Sending notification");
        let body = serde_json::to_vec(&notification)?;
        self.exchange(body).await?;
        Ok(())
    }

    /// Start collecting calls into a batch
    pub fn batch(&self) {
        self.requests.lock().begin_batch();
    }

    pub fn is_batching(&self) -> bool {
        self.requests.lock().is_batching()
    }

    /// Send the open batch as one request and leave batch mode.
    ///
    /// Replies come back in the order the calls were made.
    pub async fn send(&self) -> RpcClientResult<Reply> {
        let batch = self.requests.lock().take_batch().unwrap_or_default();
        if batch.is_empty() {
            debug!("No queued requests, nothing to send");
            return Ok(Reply::Batch(Vec::new()));
        }

        info!(requests = batch.len(), "Sending batch");
        let ids: Vec<_> = batch.iter().map(|request| request.id.clone()).collect();
        let body = serde_json::to_vec(&batch)?;
        match self.exchange(body).await? {
            Some(payload) => self.parser.parse_batch(payload, &ids),
            None => Err(RpcClientError::InvalidResponse(
                "empty response to batch".to_string(),
            )),
        }
    }

    /// Headers for the next request, including the `Cookie` header when the jar is not empty
    pub fn outgoing_headers(&self) -> HeaderList {
        let mut headers: HeaderList = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
        ];
        headers.extend(
            self.config
                .connection
                .headers
                .iter()
                .map(|(name, value)| (name.clone(), value.clone())),
        );
        if let Some(cookie) = self.cookies.lock().header_value() {
            headers.push(("Cookie".to_string(), cookie));
        }
        headers
    }

    /// Snapshot of the cookie jar
    pub fn cookies(&self) -> BTreeMap<String, String> {
        self.cookies.lock().cookies().clone()
    }

    /// Replace the cookie jar, or merge `cookies` over it
    pub fn set_cookies(&self, cookies: BTreeMap<String, String>, replace: bool) {
        self.cookies.lock().set_cookies(cookies, replace);
    }

    /// One transport round trip. `None` when the server sent no body.
    async fn exchange(&self, body: Vec<u8>) -> RpcClientResult<Option<Value>> {
        let headers = self.outgoing_headers();
        let response = self.transport.send(body, headers).await?;

        self.cookies
            .lock()
            .absorb_response_headers(response.header_pairs());
        HttpErrorHandler::check(response.status)?;

        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice(&response.body).map(Some).map_err(|e| {
            RpcClientError::InvalidResponse(format!("response is not valid JSON: {}", e))
        })
    }
}
