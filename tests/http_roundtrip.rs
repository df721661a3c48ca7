//! Client against a real HTTP server running the dispatcher

mod support;

use serde_json::{Value, json};
use tandem_json_rpc_client::{ClientConfig, RequestParams, RpcClient, RpcClientError};

use support::{calculator, spawn_http_server};

fn params(value: Value) -> Option<RequestParams> {
    Some(serde_json::from_value(value).unwrap())
}

#[tokio::test]
async fn test_call_over_http_replays_session_cookie() {
    let (dispatcher, _) = calculator();
    let (addr, seen) = spawn_http_server(dispatcher).await;
    let client = RpcClient::http(&format!("http://{}/rpc", addr), ClientConfig::default()).unwrap();

    let sum = client.call_value("add", params(json!([20, 22]))).await.unwrap();
    assert_eq!(sum, json!(42));
    assert_eq!(client.cookies().get("sid").map(String::as_str), Some("abc123"));

    let square = client.call_value("square", params(json!({"x": 5}))).await.unwrap();
    assert_eq!(square, json!(25));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].cookie, None);
    assert_eq!(seen[1].cookie.as_deref(), Some("sid=abc123"));
}

#[tokio::test]
async fn test_http_status_mapping() {
    let (dispatcher, _) = calculator();
    let (addr, _) = spawn_http_server(dispatcher).await;

    let call = |path: &'static str| async move {
        let client =
            RpcClient::http(&format!("http://{}{}", addr, path), ClientConfig::default()).unwrap();
        client.call("add", params(json!([1, 2]))).await.unwrap_err()
    };

    assert!(matches!(call("/unauthorized").await, RpcClientError::AccessDenied(_)));
    assert!(matches!(call("/forbidden").await, RpcClientError::AccessDenied(_)));
    assert!(matches!(call("/missing").await, RpcClientError::ConnectionFailure(_)));
    assert!(matches!(call("/broken").await, RpcClientError::Server(_)));
}

#[tokio::test]
async fn test_basic_credentials_are_sent() {
    let (dispatcher, _) = calculator();
    let (addr, seen) = spawn_http_server(dispatcher).await;
    let config = ClientConfig::default().with_credentials("alice", Some("secret".to_string()));
    let client = RpcClient::http(&format!("http://{}/rpc", addr), config).unwrap();

    client.call_value("add", params(json!([1]))).await.unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(
        seen[0].authorization.as_deref(),
        Some("Basic YWxpY2U6c2VjcmV0")
    );
}

#[tokio::test]
async fn test_notification_and_batch_over_http() {
    let (dispatcher, touches) = calculator();
    let (addr, _) = spawn_http_server(dispatcher).await;
    let client = RpcClient::http(&format!("http://{}/rpc", addr), ClientConfig::default()).unwrap();

    client.notify("touch", None).await.unwrap();
    assert_eq!(touches.count(), 1);

    client.batch();
    client.call("subtract", params(json!([10, 4]))).await.unwrap();
    client.call("add", params(json!({"a": 1, "b": 1}))).await.unwrap();
    let values = client.send().await.unwrap().into_value().unwrap();
    assert_eq!(values, json!([6, 2]));
}

#[tokio::test]
async fn test_unreachable_server_is_connection_failure() {
    // Bind and release a port so nothing is listening on it
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = RpcClient::http(&format!("http://{}/rpc", addr), ClientConfig::default()).unwrap();
    let err = client.call("add", params(json!([1]))).await.unwrap_err();
    assert!(matches!(err, RpcClientError::ConnectionFailure(_)));
    assert!(err.is_transport_error());
}
