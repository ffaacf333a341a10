//! Agent bridge forwarding through the router

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tower::ServiceExt;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kennel::config::Config;
use kennel::server::{Server, create_router};

fn app_with_agent(url: &str) -> axum::Router {
    let mut config = Config::default();
    config.agent.url = url.to_string();
    let state = Server::with_memory(config, None).state().unwrap();
    create_router(state)
}

fn agent_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/copilotkit")
        .header("content-type", "application/json")
        .header("x-request-id", "req-1")
        .header("connection", "keep-alive")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_forwards_body_and_streams_events() {
    let agent = MockServer::start().await;
    let events = "data: {\"type\":\"RUN_STARTED\"}\n\ndata: {\"type\":\"RUN_FINISHED\"}\n\n";
    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("x-request-id", "req-1"))
        .and(body_json(json!({"threadId": "t1", "messages": []})))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(events),
        )
        .expect(1)
        .mount(&agent)
        .await;

    let response = app_with_agent(&agent.uri())
        .oneshot(agent_request(json!({"threadId": "t1", "messages": []})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/event-stream"
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(String::from_utf8(bytes.to_vec()).unwrap(), events);
}

/// Agent that answers one request with a slow chunked event stream
async fn spawn_slow_event_agent(heartbeats: usize, interval: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        // Consume headers and the content-length body before replying
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            request.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&request).to_lowercase();
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if request.len() >= end + 4 + length {
                    break;
                }
            }
            if n == 0 {
                break;
            }
        }

        socket
            .write_all(
                b"HTTP/1.1 200 OK\r\ncontent-type: text/event-stream\r\n\
                  transfer-encoding: chunked\r\nconnection: close\r\n\r\n",
            )
            .await
            .unwrap();

        let mut events: Vec<String> = (0..heartbeats)
            .map(|i| format!("data: {{\"type\":\"HEARTBEAT\",\"n\":{i}}}\n\n"))
            .collect();
        events.push("data: {\"type\":\"RUN_FINISHED\"}\n\n".to_string());

        for event in events {
            let chunk = format!("{:x}\r\n{event}\r\n", event.len());
            socket.write_all(chunk.as_bytes()).await.unwrap();
            socket.flush().await.unwrap();
            tokio::time::sleep(interval).await;
        }
        socket.write_all(b"0\r\n\r\n").await.unwrap();
        socket.shutdown().await.unwrap();
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn test_stream_outlives_client_timeout() {
    let agent_url = spawn_slow_event_agent(8, Duration::from_millis(300)).await;

    let mut config = Config::default();
    config.agent.url = agent_url;
    config.server.timeout_secs = 1;
    let app = create_router(Server::with_memory(config, None).state().unwrap());

    let response = app.oneshot(agent_request(json!({}))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The stream lasts well over a second but is never idle for that long
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = String::from_utf8(bytes.to_vec()).unwrap();
    assert_eq!(body.matches("HEARTBEAT").count(), 8);
    assert!(body.ends_with("data: {\"type\":\"RUN_FINISHED\"}\n\n"));
}

#[tokio::test]
async fn test_relays_upstream_status() {
    let agent = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({"detail": "bad input"})))
        .mount(&agent)
        .await;

    let response = app_with_agent(&agent.uri())
        .oneshot(agent_request(json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["detail"], "bad input");
}

#[tokio::test]
async fn test_agent_under_path_prefix() {
    let agent = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/agui/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&agent)
        .await;

    let response = app_with_agent(&format!("{}/agui", agent.uri()))
        .oneshot(agent_request(json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unreachable_agent_is_bad_gateway() {
    // Nothing listens on port 1
    let response = app_with_agent("http://127.0.0.1:1")
        .oneshot(agent_request(json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"]["type"], "agent_unreachable");
    assert!(body["error"]["message"].is_string());
}

#[tokio::test]
async fn test_get_is_not_routed() {
    let response = app_with_agent("http://127.0.0.1:1")
        .oneshot(
            Request::builder()
                .uri("/copilotkit")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
