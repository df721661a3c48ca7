//! Request envelopes and the batch buffer

use tandem_json_rpc_server::{JsonRpcNotification, JsonRpcRequest, RequestId, RequestParams};
use tracing::debug;

/// Builds request envelopes and holds them while a batch is open
#[derive(Debug, Default)]
pub struct RequestBuilder {
    batch: Option<Vec<JsonRpcRequest>>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Random correlation id; collisions are tolerated
    pub fn next_id() -> RequestId {
        RequestId::from(rand::random::<u32>())
    }

    /// Envelope with a fresh id. Empty params are left out of the envelope.
    pub fn prepare_request(method: &str, params: Option<RequestParams>) -> JsonRpcRequest {
        JsonRpcRequest::new(Self::next_id(), method, params)
    }

    pub fn prepare_notification(
        method: &str,
        params: Option<RequestParams>,
    ) -> JsonRpcNotification {
        JsonRpcNotification::new(method, params)
    }

    /// Open a batch. Requests already buffered are kept.
    pub fn begin_batch(&mut self) {
        if self.batch.is_none() {
            debug!("Starting batch");
            self.batch = Some(Vec::new());
        }
    }

    pub fn is_batching(&self) -> bool {
        self.batch.is_some()
    }

    /// Buffer a request when a batch is open; otherwise hand it back
    pub fn enqueue(&mut self, request: JsonRpcRequest) -> Result<RequestId, JsonRpcRequest> {
        match self.batch.as_mut() {
            Some(buffer) => {
                let id = request.id.clone();
                debug!(method = %request.method, id = %id, "Queued request in batch");
                buffer.push(request);
                Ok(id)
            }
            None => Err(request),
        }
    }

    /// Close the batch and take its requests in call order
    pub fn take_batch(&mut self) -> Option<Vec<JsonRpcRequest>> {
        self.batch.take()
    }

    pub fn pending(&self) -> usize {
        self.batch.as_ref().map_or(0, Vec::len)
    }
}
