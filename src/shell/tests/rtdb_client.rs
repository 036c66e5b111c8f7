use futures_util::StreamExt;
use sensor_panel::{
    config::DatabaseConfig,
    rtdb_client::{FirebaseClient, RealtimeDatabase},
    sse::StreamEvent,
};
use serde_json::json;
use std::net::SocketAddr;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// What the mock server saw of a single request
#[derive(Debug)]
struct Received {
    request_line: String,
    headers: Vec<String>,
    body: String,
}

// Serves exactly one connection with a canned response
async fn start_mock_database(response: String) -> (SocketAddr, oneshot::Receiver<Received>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind mock database");
    let addr = listener.local_addr().expect("failed to get local address");
    let (received_tx, received_rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("failed to accept");
        let mut reader = BufReader::new(&mut stream);

        let mut request_line = String::new();
        reader
            .read_line(&mut request_line)
            .await
            .expect("failed to read request line");

        // Read HTTP headers
        let mut headers = Vec::new();
        let mut content_length = 0;
        loop {
            let mut line = String::new();
            reader
                .read_line(&mut line)
                .await
                .expect("failed to read header");
            let line = line.trim().to_string();
            if line.is_empty() {
                break;
            }
            if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                content_length = value.trim().parse().unwrap_or(0);
            }
            headers.push(line);
        }

        let mut body = vec![0; content_length];
        reader
            .read_exact(&mut body)
            .await
            .expect("failed to read body");

        let _ = received_tx.send(Received {
            request_line: request_line.trim().to_string(),
            headers,
            body: String::from_utf8_lossy(&body).to_string(),
        });

        let _ = stream.write_all(response.as_bytes()).await;
        let _ = stream.shutdown().await;
    });

    (addr, received_rx)
}

fn json_response(status: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

fn client(addr: SocketAddr, auth: Option<&str>) -> FirebaseClient {
    FirebaseClient::new(&DatabaseConfig {
        url: format!("http://{addr}"),
        auth: auth.map(str::to_string),
    })
    .expect("failed to create client")
}

#[tokio::test]
async fn read_returns_json_value() {
    let (addr, received) = start_mock_database(json_response("200 OK", "23.5")).await;

    let value = client(addr, None)
        .read("Sensor/temperature".to_string())
        .await
        .expect("read should succeed");

    assert_eq!(value.as_deref(), Some("23.5"));
    let received = received.await.expect("request should be received");
    assert_eq!(received.request_line, "GET /Sensor/temperature.json HTTP/1.1");
}

#[tokio::test]
async fn read_of_missing_node_is_none() {
    let (addr, _received) = start_mock_database(json_response("200 OK", "null")).await;

    let value = client(addr, None)
        .read("Sensor/humidity".to_string())
        .await
        .expect("read should succeed");

    assert_eq!(value, None);
}

#[tokio::test]
async fn read_failure_carries_status_and_body() {
    let (addr, _received) = start_mock_database(json_response(
        "401 Unauthorized",
        r#"{"error":"Permission denied"}"#,
    ))
    .await;

    let err = client(addr, None)
        .read("Sensor/temperature".to_string())
        .await
        .unwrap_err();

    let message = format!("{err:#}");
    assert!(message.contains("read Sensor/temperature failed with status 401"));
    assert!(message.contains("Permission denied"));
}

#[tokio::test]
async fn write_puts_json_with_auth() {
    let (addr, received) = start_mock_database(json_response("200 OK", "true")).await;

    client(addr, Some("s3cr3t"))
        .write("Led/status".to_string(), "true".to_string())
        .await
        .expect("write should succeed");

    let received = received.await.expect("request should be received");
    assert_eq!(
        received.request_line,
        "PUT /Led/status.json?auth=s3cr3t HTTP/1.1"
    );
    assert!(
        received
            .headers
            .iter()
            .any(|h| h.eq_ignore_ascii_case("content-type: application/json"))
    );
    assert_eq!(received.body, "true");
}

#[tokio::test]
async fn listen_decodes_event_stream() {
    let body = concat!(
        "event: put\n",
        "data: {\"path\":\"/\",\"data\":21.5}\n\n",
        "event: keep-alive\n",
        "data: null\n\n",
        "event: put\n",
        "data: {\"path\":\"/\",\"data\":22}\n\n",
    );
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\nConnection: close\r\n\r\n{body}"
    );
    let (addr, received) = start_mock_database(response).await;

    let events: Vec<StreamEvent> = client(addr, None)
        .listen("Sensor/temperature".to_string())
        .await
        .expect("listen should succeed")
        .map(|event| event.expect("event should decode"))
        .collect()
        .await;

    assert_eq!(
        events,
        vec![
            StreamEvent::Put {
                path: "/".to_string(),
                data: json!(21.5)
            },
            StreamEvent::KeepAlive,
            StreamEvent::Put {
                path: "/".to_string(),
                data: json!(22)
            },
        ]
    );

    let received = received.await.expect("request should be received");
    assert!(
        received
            .headers
            .iter()
            .any(|h| h.eq_ignore_ascii_case("accept: text/event-stream"))
    );
}

#[tokio::test]
async fn listen_rejects_error_status() {
    let (addr, _received) =
        start_mock_database(json_response("404 Not Found", r#"{"error":"nope"}"#)).await;

    let result = client(addr, None).listen("Led/status".to_string()).await;

    let err = result.err().expect("listen should fail");
    assert!(format!("{err:#}").contains("listen Led/status failed with status 404"));
}
