use serde_json::{Value, json};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::RwLock;

use docbox::Server;
use docbox::config::{RuntimeConfig, StartupConfig};

struct Connection {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl Connection {
    async fn open(addr: std::net::SocketAddr) -> Self {
        let (read_half, writer) = TcpStream::connect(addr).await.unwrap().into_split();
        Self {
            reader: BufReader::new(read_half),
            writer,
        }
    }

    async fn send_raw(&mut self, line: &str) -> Value {
        self.writer.write_all(line.as_bytes()).await.unwrap();
        self.writer.write_all(b"\n").await.unwrap();
        let mut response = String::new();
        self.reader.read_line(&mut response).await.unwrap();
        serde_json::from_str(&response).unwrap()
    }

    async fn send(&mut self, request: Value) -> Value {
        self.send_raw(&request.to_string()).await
    }
}

async fn start(runtime: RuntimeConfig) -> (TempDir, std::net::SocketAddr) {
    let dir = TempDir::new().unwrap();
    let startup = StartupConfig {
        bind_address: "127.0.0.1".into(),
        port: 0,
        sandbox_root: dir.path().join("docs").to_string_lossy().into_owned(),
        max_request_length: 4096,
        connection_timeout_secs: 30,
    };
    let server = Server::bind(startup, Arc::new(RwLock::new(runtime)))
        .await
        .unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(async move { server.start().await });
    (dir, addr)
}

#[tokio::test]
async fn calls_round_trip_over_tcp() {
    let (dir, addr) = start(RuntimeConfig::default()).await;
    let mut conn = Connection::open(addr).await;

    let created = conn
        .send(json!({"type": "call", "id": 1, "name": "create_file",
                     "arguments": {"filename": "notes", "content": "hello"}}))
        .await;
    assert_eq!(created["id"], 1);
    assert_eq!(created["result"]["status"], "success");
    assert_eq!(
        std::fs::read_to_string(dir.path().join("docs/notes.md")).unwrap(),
        "hello"
    );

    let read = conn
        .send(json!({"type": "call", "id": "r", "name": "read_file",
                     "arguments": {"filename": "../secret"}}))
        .await;
    assert_eq!(read["id"], "r");
    assert_eq!(read["result"]["status"], "security_error");
}

#[tokio::test]
async fn malformed_lines_keep_the_connection_open() {
    let (_dir, addr) = start(RuntimeConfig::default()).await;
    let mut conn = Connection::open(addr).await;

    let garbage = conn.send_raw("{not json").await;
    assert_eq!(garbage["result"]["status"], "error");

    let too_long = conn.send_raw(&"x".repeat(5000)).await;
    assert!(too_long["result"]["error"].as_str().unwrap().contains("too long"));

    let schemas = conn.send(json!({"type": "schemas"})).await;
    assert_eq!(schemas["result"]["functions"].as_array().unwrap().len(), 13);

    let bye = conn.send(json!({"type": "quit", "id": 9})).await;
    assert_eq!(bye["result"]["message"], "Goodbye");
}

#[tokio::test]
async fn rate_limit_applies_per_connection() {
    let (_dir, addr) = start(RuntimeConfig {
        max_clients: 4,
        max_requests_per_minute: 2,
    })
    .await;
    let mut conn = Connection::open(addr).await;

    for _ in 0..2 {
        let ok = conn.send(json!({"type": "catalog"})).await;
        assert_eq!(ok["result"]["status"], "success");
    }
    let limited = conn.send(json!({"type": "catalog"})).await;
    assert!(limited["result"]["error"].as_str().unwrap().contains("Rate limit"));
}

#[tokio::test]
async fn extra_clients_are_refused() {
    let (_dir, addr) = start(RuntimeConfig {
        max_clients: 1,
        max_requests_per_minute: 60,
    })
    .await;
    let mut first = Connection::open(addr).await;
    let ok = first.send(json!({"type": "catalog"})).await;
    assert_eq!(ok["result"]["status"], "success");

    let second = TcpStream::connect(addr).await.unwrap();
    let mut reader = BufReader::new(second);
    let mut line = String::new();
    reader.read_line(&mut line).await.unwrap();
    let refusal: Value = serde_json::from_str(&line).unwrap();
    assert!(refusal["result"]["error"].as_str().unwrap().contains("Too many connections"));
}
