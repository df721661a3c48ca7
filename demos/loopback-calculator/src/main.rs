//! # Loopback Calculator
//!
//! Runs the JSON-RPC server core and client in one process. The client's
//! transport hands encoded requests straight to the dispatcher, so every call
//! still goes through the full encode/dispatch/decode pipeline.
//!
//! ```text
//! RUST_LOG=debug cargo run -p loopback-calculator
//! ```

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use tandem_json_rpc_client::transport::HeaderList;
use tandem_json_rpc_client::{
    ClientConfig, Reply, RequestParams, RpcClient, RpcClientError, RpcClientResult, Transport,
    TransportResponse,
};
use tandem_json_rpc_server::prelude::*;
use tracing::{info, warn};

struct LoopbackTransport {
    dispatcher: Arc<Dispatcher>,
}

#[async_trait]
impl Transport for LoopbackTransport {
    fn endpoint(&self) -> &str {
        "loopback://calculator"
    }

    async fn send(
        &self,
        body: Vec<u8>,
        _headers: HeaderList,
    ) -> RpcClientResult<TransportResponse> {
        let reply = self
            .dispatcher
            .handle_payload(&body)
            .map_err(|e| RpcClientError::Server(e.to_string()))?;
        Ok(TransportResponse::ok(reply.unwrap_or_default()))
    }
}

fn calculator() -> ProcedureRegistry {
    let mut registry = ProcedureRegistry::new();
    registry
        .register(
            "add",
            FnProcedure::new(
                Signature::new().required("a").optional("b", json!(0.0)),
                |args: BoundArguments| Ok(args.get::<f64>(0)? + args.get::<f64>(1)?),
            ),
        )
        .register(
            "divide",
            FnProcedure::new(
                Signature::new().required("dividend").required("divisor"),
                |args: BoundArguments| {
                    let divisor: f64 = args.get(1)?;
                    if divisor == 0.0 {
                        return Err(ProcedureError::new("division by zero").with_code(-32001));
                    }
                    Ok(args.get::<f64>(0)? / divisor)
                },
            ),
        )
        .register_class(
            "Math",
            Arc::new(MethodTable::new().with_method(
                "sqrt",
                FnProcedure::new(Signature::new().required("x"), |args: BoundArguments| {
                    Ok(args.get::<f64>(0)?.sqrt())
                }),
            )),
        )
        .bind_class("sqrt", "Math", "sqrt");
    registry
}

fn params(value: Value) -> anyhow::Result<Option<RequestParams>> {
    Ok(Some(serde_json::from_value(value)?))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("loopback_calculator=info".parse()?),
        )
        .init();

    let dispatcher = Arc::new(Dispatcher::new(calculator()));
    info!(procedures = ?dispatcher.registry().procedure_names(), "Calculator ready");

    let client = RpcClient::new(
        Box::new(LoopbackTransport { dispatcher }),
        ClientConfig::default().with_suppressed_errors(true),
    );

    let sum = client.call_value("add", params(json!([1.5, 2.5]))?).await?;
    info!("add(1.5, 2.5) = {}", sum);

    let quotient = client
        .call_value("divide", params(json!({"divisor": 4, "dividend": 10}))?)
        .await?;
    info!("divide(dividend: 10, divisor: 4) = {}", quotient);

    client.batch();
    client.call("sqrt", params(json!([16]))?).await?;
    client.call("divide", params(json!([1, 0]))?).await?;
    client.call("modulo", params(json!([7, 2]))?).await?;

    if let Reply::Batch(replies) = client.send().await? {
        for reply in replies {
            match reply {
                Reply::Value(value) => info!("batch result: {}", value),
                Reply::Error(error) => warn!("batch error: {}", error),
                other => warn!("unexpected reply: {:?}", other),
            }
        }
    }

    Ok(())
}
