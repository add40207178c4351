//! In-process stubs of the remote surfaces the transports speak to.
//!
//! `StubDevice` mimics a devkit's remote inspector: the HTTP `/json`
//! target list (with the firmware quirk of omitting
//! `webSocketDebuggerUrl`) and a WebSocket endpoint answering
//! `Runtime` commands. `StubHub` and `StubDart` serve just enough of
//! the WebDriver and DART HTTP surfaces for the other transports.

// Each test binary uses its own subset of the stubs.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;

/// Opt-in test logging: `RUST_LOG=debug cargo test -- --nocapture`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

// ============================================================================
// Shared request log
// ============================================================================

/// One HTTP request a stub saw.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

// ============================================================================
// StubDevice (inspector surface)
// ============================================================================

/// A fake devkit speaking the remote inspector protocol.
pub struct StubDevice {
    addr: SocketAddr,
    scripts: Arc<Mutex<Vec<String>>>,
}

impl StubDevice {
    /// Starts the stub on an ephemeral loopback port.
    pub async fn start() -> Self {
        init_tracing();
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        let scripts: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

        let loop_scripts = Arc::clone(&scripts);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(serve_device_connection(stream, Arc::clone(&loop_scripts)));
            }
        });

        Self { addr, scripts }
    }

    /// `host:port` string tests pass to `connect`.
    pub fn address(&self) -> String {
        format!("127.0.0.1:{}", self.addr.port())
    }

    /// Every expression the device was asked to evaluate.
    pub fn evaluated_scripts(&self) -> Vec<String> {
        self.scripts.lock().clone()
    }
}

/// Routes one device connection: `/json` over plain HTTP, anything
/// else is a WebSocket debugger attach.
async fn serve_device_connection(mut stream: TcpStream, scripts: Arc<Mutex<Vec<String>>>) {
    let mut head = [0u8; 16];
    let Ok(n) = stream.peek(&mut head).await else {
        return;
    };

    if head[..n].starts_with(b"GET /json") {
        // Drain the request, then advertise one shell page. The
        // websocket URL is deliberately omitted to exercise the
        // client's repair path.
        let mut request = [0u8; 2048];
        let _ = stream.read(&mut request).await;

        let body = json!([{
            "pageID": 1,
            "title": "shell",
            "processDisplayName": "Live Area / Store / RegCAM"
        }])
        .to_string();
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        let _ = stream.write_all(response.as_bytes()).await;
        return;
    }

    let Ok(ws) = tokio_tungstenite::accept_async(stream).await else {
        return;
    };
    serve_inspector_socket(ws, scripts).await;
}

/// Answers `Runtime` commands on an attached debugger socket.
async fn serve_inspector_socket(
    mut ws: tokio_tungstenite::WebSocketStream<TcpStream>,
    scripts: Arc<Mutex<Vec<String>>>,
) {
    while let Some(Ok(message)) = ws.next().await {
        let Message::Text(text) = message else {
            if matches!(message, Message::Close(_)) {
                break;
            }
            continue;
        };

        let Ok(request) = serde_json::from_str::<Value>(&text) else {
            continue;
        };
        let id = request["id"].as_u64().unwrap_or(0);

        let reply = match request["method"].as_str().unwrap_or_default() {
            "Runtime.enable" => json!({ "id": id, "result": {} }),
            "Runtime.evaluate" => {
                let expression = request["params"]["expression"]
                    .as_str()
                    .unwrap_or_default()
                    .to_string();
                let result = evaluate_on_stub(&expression);
                scripts.lock().push(expression);
                json!({ "id": id, "result": result })
            }
            other => json!({ "id": id, "error": { "message": format!("unknown method {other}") } }),
        };

        if ws.send(Message::Text(reply.to_string().into())).await.is_err() {
            break;
        }
    }
}

/// The stub's tiny remote runtime.
fn evaluate_on_stub(expression: &str) -> Value {
    if expression == "1+1" {
        return json!({ "result": { "type": "number", "value": 2 }, "wasThrown": false });
    }
    if expression.contains("dispatchEvent") {
        return json!({ "result": { "type": "boolean", "value": true }, "wasThrown": false });
    }
    if expression.contains("window.throwing") {
        return json!({
            "result": { "type": "object", "description": "Error: boom" },
            "wasThrown": true
        });
    }
    json!({ "result": { "type": "boolean", "value": false }, "wasThrown": false })
}

// ============================================================================
// Minimal HTTP plumbing for the control-plane stubs
// ============================================================================

async fn read_request(stream: &mut TcpStream) -> Option<RecordedRequest> {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    if reader.read_line(&mut request_line).await.ok()? == 0 {
        return None;
    }
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let path = parts.next()?.to_string();

    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).await.ok()?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
            content_length = value.trim().parse().unwrap_or(0);
        }
    }

    let mut body = vec![0u8; content_length];
    if content_length > 0 {
        reader.read_exact(&mut body).await.ok()?;
    }

    Some(RecordedRequest {
        method,
        path,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

async fn write_response(stream: &mut TcpStream, content_type: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes()).await;
}

/// One-connection-per-request HTTP stub driven by a routing closure.
async fn serve_http<F>(listener: TcpListener, log: Arc<Mutex<Vec<RecordedRequest>>>, route: F)
where
    F: Fn(&RecordedRequest) -> (String, String) + Send + Sync + 'static,
{
    let route = Arc::new(route);
    while let Ok((mut stream, _)) = listener.accept().await {
        let log = Arc::clone(&log);
        let route = Arc::clone(&route);
        tokio::spawn(async move {
            if let Some(request) = read_request(&mut stream).await {
                let (content_type, body) = route(&request);
                log.lock().push(request);
                write_response(&mut stream, &content_type, &body).await;
            }
        });
    }
}

// ============================================================================
// StubHub (WebDriver surface)
// ============================================================================

/// A fake WebDriver hub plus simulator page runtime.
pub struct StubHub {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubHub {
    /// Starts the stub; the harness page reports ready after
    /// `polls_until_ready` readiness checks.
    pub async fn start(polls_until_ready: usize) -> Self {
        init_tracing();
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        let requests: Arc<Mutex<Vec<RecordedRequest>>> = Arc::new(Mutex::new(Vec::new()));

        let polls_left = Arc::new(Mutex::new(polls_until_ready));
        tokio::spawn(serve_http(
            listener,
            Arc::clone(&requests),
            move |request| {
                let value = match (request.method.as_str(), request.path.as_str()) {
                    ("POST", "/wd/hub/session") => {
                        json!({ "sessionId": "stub-session", "status": 0, "value": {} })
                    }
                    ("POST", path) if path.ends_with("/execute") => {
                        let script = serde_json::from_str::<Value>(&request.body)
                            .ok()
                            .and_then(|b| b["script"].as_str().map(String::from))
                            .unwrap_or_default();
                        json!({ "status": 0, "value": run_page_script(&script, &polls_left) })
                    }
                    ("POST", path) if path.ends_with("/url") => {
                        json!({ "status": 0, "value": null })
                    }
                    ("DELETE", _) => json!({ "status": 0, "value": null }),
                    _ => json!({ "status": 9, "value": { "message": "unknown command" } }),
                };
                ("application/json".to_string(), value.to_string())
            },
        ));

        Self { addr, requests }
    }

    /// `host:port` string tests pass to `connect`.
    pub fn address(&self) -> String {
        format!("127.0.0.1:{}", self.addr.port())
    }

    /// Every request the hub saw.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Scripts that went through `/execute`.
    pub fn executed_scripts(&self) -> Vec<String> {
        self.requests()
            .iter()
            .filter(|r| r.path.ends_with("/execute"))
            .filter_map(|r| {
                serde_json::from_str::<Value>(&r.body)
                    .ok()
                    .and_then(|b| b["script"].as_str().map(String::from))
            })
            .collect()
    }
}

/// The simulator page's stub runtime.
fn run_page_script(script: &str, polls_left: &Arc<Mutex<usize>>) -> Value {
    if script.contains("window.RemoteShell !== undefined") {
        let mut left = polls_left.lock();
        if *left > 0 {
            *left -= 1;
            return json!(false);
        }
        return json!(true);
    }
    if script.contains("return (1+1);") {
        return json!(2);
    }
    if script.contains("dispatchEvent") {
        return json!(null);
    }
    json!(null)
}

// ============================================================================
// StubDart (device-automation surface)
// ============================================================================

/// A fake DART control plane.
pub struct StubDart {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubDart {
    /// Starts the stub on an ephemeral loopback port.
    pub async fn start() -> Self {
        init_tracing();
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        let requests: Arc<Mutex<Vec<RecordedRequest>>> = Arc::new(Mutex::new(Vec::new()));

        tokio::spawn(serve_http(
            listener,
            Arc::clone(&requests),
            |request| {
                let body = match request.path.as_str() {
                    path if path.contains("/definitions/by-name/") => "run-1".to_string(),
                    path if path.ends_with("/processId") => "proc-9".to_string(),
                    _ => String::new(),
                };
                ("text/plain".to_string(), body)
            },
        ));

        Self { addr, requests }
    }

    /// Control plane root URL for `ConnectOptions::with_dart_base_url`.
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}/dart/rest/test/", self.addr.port())
    }

    /// Every request the control plane saw.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }
}
