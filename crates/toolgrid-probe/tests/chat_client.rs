//! ChatClient tests against a local loopback server.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use toolgrid_probe::{ChatClient, ChatRequest, ProbeError};

/// Accept one connection, read the full request, answer with `status`/`body`.
async fn serve_once(listener: TcpListener, status: &str, body: String) {
    let (mut socket, _) = listener.accept().await.expect("accept");

    let mut request = Vec::new();
    let mut chunk = [0u8; 4096];
    let (header_end, mut total) = loop {
        let read = socket.read(&mut chunk).await.expect("read request");
        assert!(read > 0, "client closed before sending a full request");
        request.extend_from_slice(&chunk[..read]);
        if let Some(pos) = request
            .windows(4)
            .position(|window| window == b"\r\n\r\n")
        {
            break (pos + 4, request.len());
        }
    };

    // Drain the request body so the client never sees an early close.
    let headers = String::from_utf8_lossy(&request[..header_end]).to_lowercase();
    let content_length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    while total - header_end < content_length {
        let read = socket.read(&mut chunk).await.expect("read body");
        assert!(read > 0, "client closed mid-body");
        total += read;
    }

    let response = format!(
        "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    );
    socket
        .write_all(response.as_bytes())
        .await
        .expect("write response");
    socket.shutdown().await.ok();
}

async fn client_for(status: &'static str, body: &str) -> ChatClient {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let body = body.to_string();
    tokio::spawn(async move { serve_once(listener, status, body).await });
    ChatClient::new(format!("http://{addr}/api/v1"), "test-key")
}

#[tokio::test]
async fn chat_parses_successful_response() {
    let client = client_for(
        "200 OK",
        r#"{"choices":[{"message":{"content":"It is sunny."},"finish_reason":"stop"}]}"#,
    )
    .await;

    let response = client
        .chat(&ChatRequest::new("vendor/model", "weather?"))
        .await
        .expect("chat");

    assert_eq!(
        response.choices[0].message.content.as_deref(),
        Some("It is sunny.")
    );
    assert_eq!(response.choices[0].finish_reason.as_deref(), Some("stop"));
}

#[tokio::test]
async fn chat_surfaces_api_errors_with_body() {
    let client = client_for("404 Not Found", r#"{"error":"No endpoints found"}"#).await;

    let error = client
        .chat(&ChatRequest::new("vendor/missing", "weather?"))
        .await
        .expect_err("expected API error");

    match error {
        ProbeError::Api { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("No endpoints found"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn get_json_joins_paths() {
    let client = client_for("200 OK", r#"{"data":{"endpoints":[]}}"#).await;

    let value = client
        .get_json("models/vendor/model/endpoints")
        .await
        .expect("get_json");

    assert!(value["data"]["endpoints"].as_array().expect("array").is_empty());
}
