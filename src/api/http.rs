//! HTTP server setup with Axum

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use super::sse::handler::{open_channel, post_message, server_info_handler};
use super::sse::AppState;

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    // Agents connect from anywhere
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = state.config.routes.clone();

    Router::new()
        // MCP over SSE
        .route(&routes.sse_uri, get(open_channel))
        .route(&routes.messages_uri, post(post_message))
        .route("/mcp/info", get(server_info_handler))
        // Health check
        .route("/health", get(health_check))
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AgentToken, VibesConfig};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use futures::StreamExt;
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    fn state(config: VibesConfig) -> Arc<AppState> {
        Arc::new(AppState::from_config(config).unwrap())
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = create_router(state(VibesConfig::default()));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn test_info_reports_counts() {
        let state = state(VibesConfig::default());
        state.sessions.open("/mcp/sse/messages", None).await.unwrap();
        let app = create_router(state);

        let response = app
            .oneshot(Request::builder().uri("/mcp/info").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let info = json_body(response).await;
        assert_eq!(info["name"], "laravel-vibes-server");
        assert_eq!(info["protocol_version"], "2024-11-05");
        assert_eq!(info["tool_count"], 3);
        assert_eq!(info["method_count"], 8);
        assert_eq!(info["active_sessions"], 1);
    }

    #[tokio::test]
    async fn test_open_channel_streams_endpoint_first() {
        let app = create_router(state(VibesConfig::default()));

        let response = app
            .oneshot(Request::builder().uri("/mcp/sse").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["content-type"], "text/event-stream");
        assert_eq!(response.headers()["cache-control"], "no-cache");
        assert_eq!(response.headers()["x-accel-buffering"], "no");

        let mut frames = response.into_body().into_data_stream();
        let first = frames.next().await.unwrap().unwrap();
        let first = String::from_utf8(first.to_vec()).unwrap();
        assert!(first.starts_with("event: endpoint\ndata: /mcp/sse/messages?session_id="));
    }

    #[tokio::test]
    async fn test_open_channel_requires_token() {
        let mut config = VibesConfig::default();
        config.service.requires_authentication = true;
        config.auth.tokens.push(AgentToken {
            token: "s3cret".to_string(),
            entity_id: "42".to_string(),
            entity_type: "user".to_string(),
        });
        let state = state(config);

        let missing = create_router(state.clone())
            .oneshot(Request::builder().uri("/mcp/sse").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

        let wrong = create_router(state.clone())
            .oneshot(
                Request::builder()
                    .uri("/mcp/sse?token=guess")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

        let ok = create_router(state)
            .oneshot(
                Request::builder()
                    .uri("/mcp/sse?token=s3cret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(ok.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_post_message_accepted() {
        let state = state(VibesConfig::default());
        let sesh = state.sessions.open("/mcp/sse/messages", None).await.unwrap();
        let app = create_router(state.clone());

        let uri = format!("/mcp/sse/messages?session_id={}", sesh.session_id);
        let response = app
            .oneshot(post(&uri, json!({"jsonrpc": "2.0", "method": "ping", "id": 7})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let stored = state.sessions.require(&sesh.session_id).await.unwrap();
        assert_eq!(stored.pending_method.unwrap().method, "ping");
    }

    #[tokio::test]
    async fn test_post_message_session_in_body() {
        let state = state(VibesConfig::default());
        let sesh = state.sessions.open("/mcp/sse/messages", None).await.unwrap();
        let app = create_router(state);

        let body = json!({
            "jsonrpc": "2.0",
            "method": "tools/list",
            "session_id": sesh.session_id,
            "id": 1
        });
        let response = app.oneshot(post("/mcp/sse/messages", body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn test_post_message_unknown_session() {
        let app = create_router(state(VibesConfig::default()));

        let response = app
            .oneshot(post(
                "/mcp/sse/messages?session_id=ghost",
                json!({"jsonrpc": "2.0", "method": "ping", "id": 1}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], -31000);
    }

    #[tokio::test]
    async fn test_post_message_invalid_request() {
        let app = create_router(state(VibesConfig::default()));

        let response = app
            .clone()
            .oneshot(post(
                "/mcp/sse/messages?session_id=abc",
                json!({"jsonrpc": "1.0", "method": "ping", "id": 3}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["id"], 3);
        assert_eq!(body["error"]["code"], -32600);

        let response = app
            .oneshot(post(
                "/mcp/sse/messages",
                json!({"jsonrpc": "2.0", "method": "ping"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["message"], "session_id is required");
    }

    #[tokio::test]
    async fn test_post_message_unparseable_body() {
        let app = create_router(state(VibesConfig::default()));

        let request = Request::builder()
            .method("POST")
            .uri("/mcp/sse/messages?session_id=abc")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], -32700);
    }
}
