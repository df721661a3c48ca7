use serde_json::Value;
use tracing::{debug, warn};

use crate::binder::{Arguments, bind_arguments};
use crate::encode::{encode_batch, encode_message};
use crate::error::{DispatchError, JsonRpcErrorObject, ResponseEncodingFailure, ToJsonRpcError};
use crate::notification::JsonRpcNotification;
use crate::procedure::BoundArguments;
use crate::registry::ProcedureRegistry;
use crate::request::JsonRpcRequest;
use crate::response::JsonRpcMessage;
use crate::types::RequestId;

/// An incoming message after structural validation
#[derive(Debug, Clone)]
pub enum IncomingMessage {
    Request(JsonRpcRequest),
    Notification(JsonRpcNotification),
}

/// Server core: resolves, binds, executes and packages calls
pub struct Dispatcher {
    registry: ProcedureRegistry,
}

impl Dispatcher {
    pub fn new(registry: ProcedureRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ProcedureRegistry {
        &self.registry
    }

    /// Run one procedure. Failures come back as typed errors, not response objects.
    pub fn execute_procedure(
        &self,
        name: &str,
        arguments: Arguments,
    ) -> Result<Value, DispatchError> {
        let binding = self.registry.resolve(name)?;
        let target = self.registry.resolve_target(binding)?;
        let bound = bind_arguments(&arguments, target.signature().params())?;
        debug!(procedure = name, args = bound.len(), "Executing procedure");
        target.invoke(BoundArguments::new(bound))
    }

    /// Answer one request; any failure is packaged into an error response
    pub fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcMessage {
        let arguments = request.arguments();
        match self.execute_procedure(&request.method, arguments) {
            Ok(result) => JsonRpcMessage::success(request.id, result),
            Err(e) => {
                debug!(
                    procedure = %request.method,
                    id = %request.id,
                    error = %e,
                    "Procedure failed"
                );
                JsonRpcMessage::error(Some(request.id), e.to_error_object())
            }
        }
    }

    /// Run a notification. There is nobody to report failures to, so they are only logged.
    pub fn handle_notification(&self, notification: JsonRpcNotification) {
        let arguments = notification.arguments();
        if let Err(e) = self.execute_procedure(&notification.method, arguments) {
            warn!(procedure = %notification.method, error = %e, "Notification failed");
        }
    }

    /// Handle one raw message object; `None` for notifications
    pub fn handle_value(&self, value: Value) -> Option<JsonRpcMessage> {
        match parse_message(value) {
            Ok(IncomingMessage::Request(request)) => Some(self.handle_request(request)),
            Ok(IncomingMessage::Notification(notification)) => {
                self.handle_notification(notification);
                None
            }
            Err(error) => Some(error),
        }
    }

    /// Handle batch entries in order. A failing entry never affects its siblings.
    pub fn handle_batch(&self, entries: Vec<Value>) -> Vec<JsonRpcMessage> {
        debug!(entries = entries.len(), "Processing batch");
        entries
            .into_iter()
            .filter_map(|entry| self.handle_value(entry))
            .collect()
    }

    /// Full wire pipeline: bytes in, bytes out. `None` when nothing needs to be sent back.
    pub fn handle_payload(
        &self,
        payload: &[u8],
    ) -> Result<Option<Vec<u8>>, ResponseEncodingFailure> {
        let value: Value = match serde_json::from_slice(payload) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Malformed JSON-RPC payload");
                let message = JsonRpcMessage::error(None, JsonRpcErrorObject::parse_error(None));
                return encode_message(&message).map(Some);
            }
        };

        match value {
            Value::Array(entries) if entries.is_empty() => {
                let message = JsonRpcMessage::error(
                    None,
                    JsonRpcErrorObject::invalid_request(Some("empty batch".to_string())),
                );
                encode_message(&message).map(Some)
            }
            Value::Array(entries) => {
                let responses = self.handle_batch(entries);
                if responses.is_empty() {
                    Ok(None)
                } else {
                    encode_batch(&responses).map(Some)
                }
            }
            other => match self.handle_value(other) {
                Some(message) => encode_message(&message).map(Some),
                None => Ok(None),
            },
        }
    }
}

/// Validate the envelope of one message. Errors are ready-made error responses.
pub fn parse_message(value: Value) -> Result<IncomingMessage, JsonRpcMessage> {
    let Some(object) = value.as_object() else {
        return Err(invalid_request(None, "request must be an object"));
    };

    let id = object.get("id").and_then(RequestId::from_value);
    if object.get("jsonrpc").and_then(Value::as_str) != Some(crate::JSONRPC_VERSION) {
        return Err(invalid_request(id, "jsonrpc must be \"2.0\""));
    }
    if !object.get("method").is_some_and(Value::is_string) {
        return Err(invalid_request(id, "method must be a string"));
    }

    if object.contains_key("id") {
        if id.is_none() {
            return Err(invalid_request(None, "id must be a string, an integer or null"));
        }
        serde_json::from_value::<JsonRpcRequest>(value)
            .map(IncomingMessage::Request)
            .map_err(|e| invalid_request(id, &e.to_string()))
    } else {
        serde_json::from_value::<JsonRpcNotification>(value)
            .map(IncomingMessage::Notification)
            .map_err(|e| invalid_request(None, &e.to_string()))
    }
}

fn invalid_request(id: Option<RequestId>, message: &str) -> JsonRpcMessage {
    JsonRpcMessage::error(id, JsonRpcErrorObject::invalid_request(Some(message.to_string())))
}
