//! Helpers shared by the integration tests.
//!
//! The server runs in-process on `127.0.0.1:0`; clients are plain
//! `tokio-tungstenite` sockets speaking the JSON frame protocol.

#![allow(dead_code)]

use std::{net::SocketAddr, time::Duration};

use futures_util::{SinkExt, StreamExt};
use pika_server::{
    bootstrap::{HubOptions, build_server},
    infrastructure::dto::websocket::{ErrorCodeDto, ServerEventDto},
};
use serde_json::json;
use tokio::{
    net::{TcpListener, TcpStream},
    sync::oneshot,
    time::timeout,
};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub const READ_TIMEOUT: Duration = Duration::from_secs(3);
pub const QUIET_PERIOD: Duration = Duration::from_millis(200);

/// Server running on an ephemeral port, shut down on drop
pub struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(HubOptions::default()).await
    }

    pub async fn start_with(options: HubOptions) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let (shutdown, signal) = oneshot::channel::<()>();

        let server = build_server(&options);
        tokio::spawn(async move {
            let shutdown = async {
                let _ = signal.await;
            };
            if let Err(e) = server.serve(listener, shutdown).await {
                panic!("server error: {}", e);
            }
        });

        TestServer {
            addr,
            shutdown: Some(shutdown),
        }
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

/// WebSocket client speaking the JSON frame protocol
pub struct TestClient {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    pub async fn connect(url: &str) -> Self {
        let (socket, _) = connect_async(url).await.expect("Failed to connect");
        TestClient { socket }
    }

    /// Connect, send `join`, and consume the `history` and `roster-update` frames
    pub async fn join(url: &str, name: &str) -> Self {
        let mut client = Self::connect(url).await;
        client.send_json(json!({"type": "join", "name": name})).await;
        match client.recv().await {
            ServerEventDto::History { .. } => {}
            other => panic!("expected history, got {:?}", other),
        }
        match client.recv().await {
            ServerEventDto::RosterUpdate { .. } => {}
            other => panic!("expected roster-update, got {:?}", other),
        }
        client
    }

    pub async fn send_json(&mut self, frame: serde_json::Value) {
        self.send_raw(&frame.to_string()).await;
    }

    pub async fn send_raw(&mut self, text: &str) {
        self.socket
            .send(Message::text(text.to_string()))
            .await
            .expect("Failed to send frame");
    }

    pub async fn send_text(&mut self, text: &str) {
        self.send_json(json!({"type": "send", "text": text})).await;
    }

    /// Next server frame, skipping control frames
    pub async fn recv(&mut self) -> ServerEventDto {
        loop {
            let msg = timeout(READ_TIMEOUT, self.socket.next())
                .await
                .expect("Timed out waiting for a frame")
                .expect("Socket closed unexpectedly")
                .expect("WebSocket error");
            if let Message::Text(text) = msg {
                return serde_json::from_str(&text).expect("Server sent malformed frame");
            }
            assert!(!msg.is_close(), "unexpected close frame");
        }
    }

    pub async fn expect_error(&mut self, expected: ErrorCodeDto) {
        match self.recv().await {
            ServerEventDto::Error { code, .. } => assert_eq!(code, expected),
            other => panic!("expected error {:?}, got {:?}", expected, other),
        }
    }

    /// Assert that nothing arrives for a short while
    pub async fn expect_silence(&mut self) {
        if let Ok(Some(Ok(msg))) = timeout(QUIET_PERIOD, self.socket.next()).await {
            panic!("expected no frame, got {:?}", msg);
        }
    }

    /// Assert that the server closes the socket
    pub async fn expect_closed(&mut self) {
        loop {
            match timeout(READ_TIMEOUT, self.socket.next())
                .await
                .expect("Timed out waiting for close")
            {
                None | Some(Err(_)) => return,
                Some(Ok(msg)) if msg.is_close() => return,
                Some(Ok(msg)) => panic!("expected close, got {:?}", msg),
            }
        }
    }

    pub async fn close(mut self) {
        let _ = self.socket.close(None).await;
    }
}

pub fn names(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}
