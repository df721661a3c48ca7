//! Shared fixtures: a calculator registry, an in-process transport and a
//! throwaway HTTP server in front of the dispatcher.

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::header::{AUTHORIZATION, COOKIE, HeaderName, SET_COOKIE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tandem_json_rpc_client::transport::HeaderList;
use tandem_json_rpc_client::{RpcClientError, RpcClientResult, Transport, TransportResponse};
use tandem_json_rpc_server::prelude::*;
use tokio::net::TcpListener;
use tracing::debug;

/// Counts `touch` notifications
#[derive(Default)]
pub struct Touches(AtomicUsize);

impl Touches {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// A live object handing out increasing numbers
struct Counter {
    value: Arc<AtomicI64>,
}

impl RpcObject for Counter {
    fn method(&self, name: &str) -> Option<Arc<dyn Procedure>> {
        let value = self.value.clone();
        match name {
            "next" => Some(Arc::new(FnProcedure::new(
                Signature::new().optional("step", json!(1)),
                move |args: BoundArguments| {
                    let step: i64 = args.get(0)?;
                    Ok(value.fetch_add(step, Ordering::SeqCst) + step)
                },
            ))),
            _ => None,
        }
    }
}

pub fn calculator_registry(touches: Arc<Touches>) -> ProcedureRegistry {
    let mut registry = ProcedureRegistry::new();
    registry
        .register(
            "add",
            FnProcedure::new(
                Signature::new().required("a").optional("b", json!(0)),
                |args: BoundArguments| Ok(args.get::<i64>(0)? + args.get::<i64>(1)?),
            ),
        )
        .register(
            "subtract",
            FnProcedure::new(
                Signature::new().required("minuend").required("subtrahend"),
                |args: BoundArguments| Ok(args.get::<i64>(0)? - args.get::<i64>(1)?),
            ),
        )
        .register(
            "divide",
            FnProcedure::new(
                Signature::new().required("dividend").required("divisor"),
                |args: BoundArguments| {
                    let divisor: i64 = args.get(1)?;
                    if divisor == 0 {
                        return Err(ProcedureError::new("division by zero")
                            .with_code(-32001)
                            .with_data(json!({"dividend": args.get::<i64>(0)?})));
                    }
                    Ok(args.get::<i64>(0)? / divisor)
                },
            ),
        )
        .register(
            "touch",
            FnProcedure::new(Signature::new(), move |_: BoundArguments| {
                touches.0.fetch_add(1, Ordering::SeqCst);
                Ok(Value::Null)
            }),
        )
        .register_class(
            "Math",
            Arc::new(MethodTable::new().with_method(
                "square",
                FnProcedure::new(Signature::new().required("x"), |args: BoundArguments| {
                    let x: i64 = args.get(0)?;
                    Ok(x * x)
                }),
            )),
        )
        .bind_class("square", "Math", "square")
        .bind_class("cube", "Math", "cube")
        .bind_class("ghost", "Phantom", "square")
        .bind_instance(
            "counter.next",
            Arc::new(Counter {
                value: Arc::new(AtomicI64::new(0)),
            }),
            "next",
        );
    registry
}

pub fn calculator() -> (Arc<Dispatcher>, Arc<Touches>) {
    let touches = Arc::new(Touches::default());
    let dispatcher = Dispatcher::new(calculator_registry(touches.clone()));
    (Arc::new(dispatcher), touches)
}

/// Hands request bytes straight to a dispatcher
pub struct LoopbackTransport {
    dispatcher: Arc<Dispatcher>,
}

impl LoopbackTransport {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }
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

/// Request headers the HTTP fixture saw, in arrival order
#[derive(Debug, Clone, Default)]
pub struct SeenRequest {
    pub cookie: Option<String>,
    pub authorization: Option<String>,
}

pub type SeenRequests = Arc<Mutex<Vec<SeenRequest>>>;

/// Serve the dispatcher over HTTP on an ephemeral loopback port.
///
/// Every response sets `sid=abc123`. The paths `/unauthorized`, `/forbidden`,
/// `/missing` and `/broken` answer 401, 403, 404 and 500 without dispatching.
pub async fn spawn_http_server(dispatcher: Arc<Dispatcher>) -> (SocketAddr, SeenRequests) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = SeenRequests::default();

    let seen_by_server = seen.clone();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let dispatcher = dispatcher.clone();
            let seen = seen_by_server.clone();
            tokio::spawn(async move {
                let io = TokioIo::new(stream);
                let service =
                    service_fn(move |req| handle_http(req, dispatcher.clone(), seen.clone()));
                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    debug!("Error serving connection: {}", err);
                }
            });
        }
    });

    (addr, seen)
}

async fn handle_http(
    req: Request<Incoming>,
    dispatcher: Arc<Dispatcher>,
    seen: SeenRequests,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    seen.lock().unwrap().push(SeenRequest {
        cookie: header_value(&req, COOKIE),
        authorization: header_value(&req, AUTHORIZATION),
    });

    let forced = match req.uri().path() {
        "/unauthorized" => Some(StatusCode::UNAUTHORIZED),
        "/forbidden" => Some(StatusCode::FORBIDDEN),
        "/missing" => Some(StatusCode::NOT_FOUND),
        "/broken" => Some(StatusCode::INTERNAL_SERVER_ERROR),
        _ => None,
    };
    let response = Response::builder().header(SET_COOKIE, "sid=abc123; Path=/; HttpOnly");
    if let Some(status) = forced {
        return Ok(response
            .status(status)
            .body(Full::new(Bytes::from(status.to_string())))
            .unwrap());
    }

    let body = req.into_body().collect().await?.to_bytes();
    let response = match dispatcher.handle_payload(&body) {
        Ok(Some(reply)) => response
            .status(StatusCode::OK)
            .header("Content-Type", "application/json")
            .body(Full::new(Bytes::from(reply))),
        Ok(None) => response
            .status(StatusCode::NO_CONTENT)
            .body(Full::new(Bytes::new())),
        Err(e) => response
            .status(StatusCode::INTERNAL_SERVER_ERROR)
            .body(Full::new(Bytes::from(e.to_string()))),
    };
    Ok(response.unwrap())
}

fn header_value(req: &Request<Incoming>, name: HeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
