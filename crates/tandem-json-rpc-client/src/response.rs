//! Response decoding and correlation

use serde_json::{Map, Value};
use tandem_json_rpc_server::{JsonRpcErrorObject, RequestId, is_positional_arguments};

use crate::error::{RpcClientError, RpcClientResult};
use crate::translate::ErrorTranslator;

/// What a call produced
#[derive(Debug)]
pub enum Reply {
    /// The `result` member, `Null` when absent
    Value(Value),
    /// A server-reported error, only produced when errors are suppressed
    Error(RpcClientError),
    /// One reply per batch entry
    Batch(Vec<Reply>),
    /// The request was buffered for the current batch
    Queued(RequestId),
}

impl Reply {
    /// Collapse into a plain result; batches become arrays and fail on the first error
    pub fn into_value(self) -> RpcClientResult<Value> {
        match self {
            Reply::Value(value) => Ok(value),
            Reply::Error(error) => Err(error),
            Reply::Batch(replies) => replies
                .into_iter()
                .map(Reply::into_value)
                .collect::<RpcClientResult<Vec<_>>>()
                .map(Value::Array),
            Reply::Queued(id) => Err(RpcClientError::InvalidResponse(format!(
                "request {} is queued in a batch and has no reply yet",
                id
            ))),
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Reply::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&RpcClientError> {
        match self {
            Reply::Error(error) => Some(error),
            _ => None,
        }
    }

    pub fn into_batch(self) -> Option<Vec<Reply>> {
        match self {
            Reply::Batch(replies) => Some(replies),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error(_))
    }
}

/// Detects single vs batch shape and decodes each response
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseParser {
    translator: ErrorTranslator,
}

impl ResponseParser {
    pub fn new(translator: ErrorTranslator) -> Self {
        Self { translator }
    }

    /// Decode raw bytes and parse them
    pub fn parse_payload(&self, payload: &[u8]) -> RpcClientResult<Reply> {
        let value: Value = serde_json::from_slice(payload).map_err(|e| {
            RpcClientError::InvalidResponse(format!("response is not valid JSON: {}", e))
        })?;
        self.parse_response(value)
    }

    /// Parse a response payload; batch entries keep encounter order
    pub fn parse_response(&self, payload: Value) -> RpcClientResult<Reply> {
        match batch_entries(payload) {
            Ok(entries) => entries
                .into_iter()
                .map(|entry| self.parse_entry(entry).map(|(_, reply)| reply))
                .collect::<RpcClientResult<Vec<_>>>()
                .map(Reply::Batch),
            Err(single) => self.parse_entry(single).map(|(_, reply)| reply),
        }
    }

    /// Parse a batch payload and order the replies to match `expected`.
    ///
    /// Every expected id gets exactly one reply; a missing reply is an
    /// `InvalidResponse` error in its slot. Entries whose id is unknown or
    /// repeated follow in encounter order.
    pub fn parse_batch(&self, payload: Value, expected: &[RequestId]) -> RpcClientResult<Reply> {
        let entries = match batch_entries(payload) {
            Ok(entries) => entries,
            // Servers answer batch-level failures (parse error, empty batch) with one object
            Err(single) => return self.parse_entry(single).map(|(_, reply)| reply),
        };

        let mut slots: Vec<Option<Reply>> = expected.iter().map(|_| None).collect();
        let mut unmatched = Vec::new();
        for entry in entries {
            let (id, reply) = self.parse_entry(entry)?;
            let slot = id
                .and_then(|id| expected.iter().position(|e| *e == id))
                .filter(|&i| slots[i].is_none());
            match slot {
                Some(i) => slots[i] = Some(reply),
                None => unmatched.push(reply),
            }
        }

        let mut replies = Vec::with_capacity(slots.len() + unmatched.len());
        for (id, slot) in expected.iter().zip(slots) {
            let reply = match slot {
                Some(reply) => reply,
                None => self.translator.surface(RpcClientError::InvalidResponse(format!(
                    "no reply for request {}",
                    id
                )))?,
            };
            replies.push(reply);
        }
        replies.extend(unmatched);
        Ok(Reply::Batch(replies))
    }

    fn parse_entry(&self, entry: Value) -> RpcClientResult<(Option<RequestId>, Reply)> {
        let Value::Object(mut object) = entry else {
            return Err(RpcClientError::InvalidResponse(
                "response entry is not an object".to_string(),
            ));
        };
        let id = object.get("id").and_then(RequestId::from_value);

        let has_error_code = object
            .get("error")
            .and_then(|e| e.get("code"))
            .is_some();
        if has_error_code {
            let error = object.remove("error").unwrap_or_default();
            let error = decode_error(error)?;
            return self.translator.translate(error).map(|reply| (id, reply));
        }

        let result = object.remove("result").unwrap_or(Value::Null);
        Ok((id, Reply::Value(result)))
    }
}

/// `Ok(entries)` for batch-shaped payloads, `Err(payload)` for a single response
fn batch_entries(payload: Value) -> Result<Vec<Value>, Value> {
    match payload {
        Value::Array(entries) => Ok(entries),
        Value::Object(map) if !map.is_empty() && is_positional_arguments(&map) => {
            Ok(index_ordered(map))
        }
        other => Err(other),
    }
}

fn index_ordered(map: Map<String, Value>) -> Vec<Value> {
    let mut indexed: Vec<(usize, Value)> = map
        .into_iter()
        .filter_map(|(key, value)| key.parse::<usize>().ok().map(|i| (i, value)))
        .collect();
    indexed.sort_by_key(|(i, _)| *i);
    indexed.into_iter().map(|(_, value)| value).collect()
}

fn decode_error(error: Value) -> RpcClientResult<JsonRpcErrorObject> {
    let code = error
        .get("code")
        .and_then(Value::as_i64)
        .ok_or_else(|| RpcClientError::InvalidResponse("error code is not an integer".into()))?;
    let message = error
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let data = error.get("data").cloned();
    Ok(JsonRpcErrorObject {
        code,
        message,
        data,
    })
}
