//! Integration tests for the Vibes MCP server
//!
//! Drive the axum router the way an agent would: open a stream, read the
//! endpoint event, POST requests and read the answers back off the stream.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, BodyDataStream};
use axum::http::{Request, StatusCode};
use axum::Router;
use futures::StreamExt;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tower::util::ServiceExt;

use vibes_mcp::api::{create_router, AppState};
use vibes_mcp::config::VibesConfig;

struct Frame {
    event: String,
    data: String,
}

impl Frame {
    fn json(&self) -> Value {
        serde_json::from_str(&self.data).unwrap()
    }
}

fn parse_frame(raw: &str) -> Frame {
    let mut event = String::new();
    let mut data = Vec::new();
    for line in raw.lines() {
        if let Some(e) = line.strip_prefix("event: ") {
            event = e.to_string();
        } else if let Some(d) = line.strip_prefix("data: ") {
            data.push(d);
        }
    }
    Frame {
        event,
        data: data.join("\n"),
    }
}

/// Next non-heartbeat frame on the stream
async fn next_frame(stream: &mut BodyDataStream) -> Frame {
    loop {
        let chunk = tokio::time::timeout(Duration::from_secs(5), stream.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("stream ended")
            .unwrap();
        let frame = parse_frame(std::str::from_utf8(&chunk).unwrap());
        if frame.event != "heartbeat" {
            return frame;
        }
    }
}

async fn open_stream(app: &Router) -> (BodyDataStream, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/mcp/sse").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let mut stream = response.into_body().into_data_stream();
    let endpoint = next_frame(&mut stream).await;
    assert_eq!(endpoint.event, "endpoint");
    (stream, endpoint.data)
}

async fn post(app: &Router, uri: &str, body: Value) -> StatusCode {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap().status()
}

fn app() -> Router {
    let state = AppState::from_config(VibesConfig::default()).unwrap();
    create_router(Arc::new(state))
}

#[tokio::test]
async fn test_endpoint_event_names_session() {
    let app = app();
    let (_stream, endpoint) = open_stream(&app).await;

    let session_id = endpoint
        .strip_prefix("/mcp/sse/messages?session_id=")
        .unwrap();
    // ULID
    assert_eq!(session_id.len(), 26);
}

#[tokio::test]
async fn test_ping_answered_on_stream() {
    let app = app();
    let (mut stream, endpoint) = open_stream(&app).await;

    let status = post(&app, &endpoint, json!({"jsonrpc": "2.0", "method": "ping", "id": 7})).await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let frame = next_frame(&mut stream).await;
    assert_eq!(frame.event, "message");
    assert_eq!(frame.json(), json!({"jsonrpc": "2.0", "id": 7, "result": {}}));
}

#[tokio::test]
async fn test_initialize_then_list_tools() {
    let app = app();
    let (mut stream, endpoint) = open_stream(&app).await;

    let init = json!({
        "jsonrpc": "2.0",
        "method": "initialize",
        "id": 0,
        "params": {
            "protocolVersion": "2024-11-05",
            "capabilities": {"tools": {"listChanged": true}},
            "clientInfo": {"name": "test-agent", "version": "0.1"}
        }
    });
    assert_eq!(post(&app, &endpoint, init).await, StatusCode::ACCEPTED);
    let frame = next_frame(&mut stream).await;
    let result = &frame.json()["result"];
    assert_eq!(result["protocolVersion"], "2024-11-05");
    assert_eq!(result["capabilities"], json!({"tools": {"listChanged": true}}));

    let list = json!({"jsonrpc": "2.0", "method": "tools/list", "id": 1});
    assert_eq!(post(&app, &endpoint, list).await, StatusCode::ACCEPTED);
    let frame = next_frame(&mut stream).await;
    assert_eq!(frame.json()["result"]["tools"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_echo_tool_end_to_end() {
    let app = app();
    let (mut stream, endpoint) = open_stream(&app).await;

    let call = json!({
        "jsonrpc": "2.0",
        "method": "tools/call",
        "id": 11,
        "params": {"name": "echo", "arguments": {"message": "good vibes"}}
    });
    assert_eq!(post(&app, &endpoint, call).await, StatusCode::ACCEPTED);

    let frame = next_frame(&mut stream).await;
    assert_eq!(frame.event, "message");
    assert_eq!(
        frame.json(),
        json!({
            "jsonrpc": "2.0",
            "id": 11,
            "result": {"content": [{"type": "text", "text": "good vibes"}]}
        })
    );
}

#[tokio::test]
async fn test_unknown_method_and_tool_come_back_as_errors() {
    let app = app();
    let (mut stream, endpoint) = open_stream(&app).await;

    let unknown = json!({"jsonrpc": "2.0", "method": "resources/read", "id": 2});
    assert_eq!(post(&app, &endpoint, unknown).await, StatusCode::ACCEPTED);
    let frame = next_frame(&mut stream).await;
    assert_eq!(frame.event, "error");
    assert_eq!(frame.json()["error"]["code"], -32601);

    let call = json!({
        "jsonrpc": "2.0",
        "method": "tools/call",
        "id": 3,
        "params": {"name": "nope"}
    });
    assert_eq!(post(&app, &endpoint, call).await, StatusCode::ACCEPTED);
    let frame = next_frame(&mut stream).await;
    assert_eq!(frame.event, "error");
    assert_eq!(frame.json()["error"]["code"], -31001);
}

#[tokio::test]
async fn test_post_to_unknown_session_fails() {
    let app = app();
    let status = post(
        &app,
        "/mcp/sse/messages?session_id=01ARZ3NDEKTSV4RRFFQ69G5FAV",
        json!({"jsonrpc": "2.0", "method": "ping", "id": 1}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_graceful_shutdown_closes_open_streams() {
    let state = Arc::new(AppState::from_config(VibesConfig::default()).unwrap());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let app = create_router(state.clone());
    let stopped = state.shutdown.clone();
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(stopped.cancelled_owned())
            .await
    });

    let mut client = TcpStream::connect(addr).await.unwrap();
    client
        .write_all(b"GET /mcp/sse HTTP/1.1\r\nHost: localhost\r\n\r\n")
        .await
        .unwrap();

    let mut received = String::new();
    let mut buf = [0u8; 4096];
    while !received.contains("event: endpoint") {
        let n = tokio::time::timeout(Duration::from_secs(5), client.read(&mut buf))
            .await
            .expect("timed out waiting for the endpoint event")
            .unwrap();
        assert!(n > 0, "stream ended before the endpoint event");
        received.push_str(&String::from_utf8_lossy(&buf[..n]));
    }
    assert!(received.starts_with("HTTP/1.1 200"));

    state.shutdown();

    loop {
        let n = tokio::time::timeout(Duration::from_secs(5), client.read(&mut buf))
            .await
            .expect("stream stayed open after shutdown")
            .unwrap();
        if n == 0 {
            break;
        }
        received.push_str(&String::from_utf8_lossy(&buf[..n]));
    }
    assert!(received.contains("event: close"));

    let served = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server did not stop after shutdown")
        .unwrap();
    assert!(served.is_ok());
}
