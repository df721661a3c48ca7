//! HTTP transport implementation

use async_trait::async_trait;
use reqwest::Client;
use reqwest::redirect::Policy;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

use crate::config::{BasicCredentials, ClientConfig};
use crate::error::{RpcClientError, RpcClientResult};
use crate::transport::{HeaderList, Transport, TransportResponse, TransportStatistics};

/// JSON-RPC over HTTP POST
#[derive(Debug)]
pub struct HttpTransport {
    /// HTTP client
    client: Client,
    /// Server endpoint URL
    endpoint: Url,
    /// Credentials attached to every request
    credentials: Option<BasicCredentials>,
    /// Statistics
    stats: Arc<parking_lot::Mutex<TransportStatistics>>,
}

impl HttpTransport {
    /// Create a transport for `endpoint`. An unusable address fails here, before any send.
    pub fn new(endpoint: &str, config: &ClientConfig) -> RpcClientResult<Self> {
        let url = parse_endpoint(endpoint)?;

        let redirect = if config.connection.follow_redirects {
            Policy::limited(config.connection.max_redirects)
        } else {
            Policy::none()
        };

        let mut builder = Client::builder()
            .connect_timeout(config.timeouts.connect)
            .timeout(config.timeouts.request)
            .redirect(redirect);
        if let Some(user_agent) = &config.connection.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        let client = builder
            .build()
            .map_err(|e| RpcClientError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: url,
            credentials: config.credentials.clone(),
            stats: Arc::new(parking_lot::Mutex::new(TransportStatistics::default())),
        })
    }

    /// Update statistics
    fn update_stats<F>(&self, update_fn: F)
    where
        F: FnOnce(&mut TransportStatistics),
    {
        let mut stats = self.stats.lock();
        update_fn(&mut stats);
    }

    fn record_error(&self, error: &RpcClientError) {
        let message = error.to_string();
        self.update_stats(|stats| {
            stats.errors += 1;
            stats.last_error = Some(message);
        });
    }
}

fn parse_endpoint(endpoint: &str) -> RpcClientResult<Url> {
    let url = Url::parse(endpoint).map_err(|e| {
        RpcClientError::ConnectionFailure(format!("Invalid URL '{}': {}", endpoint, e))
    })?;

    match url.scheme() {
        "http" => {}
        // reqwest is built without a TLS backend
        "https" => {
            return Err(RpcClientError::ConnectionFailure(format!(
                "TLS is not available, cannot reach '{}'",
                endpoint
            )));
        }
        scheme => {
            return Err(RpcClientError::ConnectionFailure(format!(
                "Invalid scheme for HTTP transport: {}",
                scheme
            )));
        }
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(RpcClientError::ConnectionFailure(format!(
            "URL '{}' has no host",
            endpoint
        )));
    }
    Ok(url)
}

#[async_trait]
impl Transport for HttpTransport {
    fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    async fn send(&self, body: Vec<u8>, headers: HeaderList) -> RpcClientResult<TransportResponse> {
        self.update_stats(|stats| stats.requests_sent += 1);

        let mut request = self.client.post(self.endpoint.clone()).body(body);
        for (name, value) in headers {
            request = request.header(name, value);
        }
        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(&credentials.username, credentials.password.as_ref());
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let error = RpcClientError::from(e);
                warn!(endpoint = %self.endpoint, error = %error, "HTTP request failed");
                self.record_error(&error);
                return Err(error);
            }
        };

        let status = response.status().as_u16();
        let headers: HeaderList = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let body = response.bytes().await.map_err(|e| {
            let error = RpcClientError::Transport(format!("Failed to read response body: {}", e));
            self.record_error(&error);
            error
        })?;

        debug!(status, bytes = body.len(), "Received HTTP response");
        self.update_stats(|stats| stats.responses_received += 1);

        Ok(TransportResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }

    fn statistics(&self) -> TransportStatistics {
        self.stats.lock().clone()
    }
}
