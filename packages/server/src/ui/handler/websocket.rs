//! WebSocket connection handlers.
//!
//! 1 接続につき 2 つのタスクを動かします。
//!
//! - `pusher_loop`: 送信キューの `ServerEvent` を JSON にしてソケットへ書き込む
//! - `receive_loop`: クライアントのフレームを解釈し、`HubHandle` に転送する
//!
//! どちらかが終了した時点でもう一方を止め、ChatHub に退出を通知します。

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::{ConnectionId, ErrorCode, ErrorNotice, PusherChannel, ServerEvent},
    infrastructure::dto::websocket::{ClientEventDto, ServerEventDto},
    ui::state::AppState,
    usecase::{ConnectError, HubError, HubHandle, SendMessageError},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// 参加前のハンドシェイク結果
enum Handshake {
    Join(String),
    Rejected(ErrorNotice),
    Closed,
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    // 最初のフレームは join でなければならない
    let display_name = match await_join(&mut receiver).await {
        Handshake::Join(name) => name,
        Handshake::Rejected(notice) => {
            reject(&mut sender, notice).await;
            return;
        }
        Handshake::Closed => {
            tracing::debug!("Socket closed before join");
            return;
        }
    };

    // Create a channel for this connection to receive events
    let (tx, rx) = mpsc::unbounded_channel();
    let connection = match state.hub.join(display_name, tx.clone()).await {
        Ok(connection) => connection,
        Err(e) => {
            tracing::warn!("Rejected join: {}", e);
            reject(&mut sender, join_error_notice(&e)).await;
            return;
        }
    };
    let connection_id = connection.id;
    tracing::info!(
        "Connection '{}' joined as '{}'",
        connection_id,
        connection.display_name
    );

    let mut send_task = pusher_loop(rx, sender);
    let mut recv_task = receive_loop(receiver, state.hub.clone(), connection_id, tx);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state.hub.leave(connection_id);
    tracing::info!("Connection '{}' closed", connection_id);
}

/// 最初の有効なフレームを待つ
async fn await_join(receiver: &mut SplitStream<WebSocket>) -> Handshake {
    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                tracing::warn!("WebSocket error before join: {}", e);
                return Handshake::Closed;
            }
        };

        match msg {
            Message::Text(text) => {
                return match serde_json::from_str::<ClientEventDto>(&text) {
                    Ok(ClientEventDto::Join { name }) => Handshake::Join(name),
                    Ok(other) => Handshake::Rejected(ErrorNotice::new(
                        ErrorCode::ProtocolViolation,
                        format!("expected join, got {}", other.kind()),
                    )),
                    Err(e) => Handshake::Rejected(ErrorNotice::new(
                        ErrorCode::ProtocolViolation,
                        format!("malformed frame: {}", e),
                    )),
                };
            }
            Message::Close(_) => return Handshake::Closed,
            _ => {}
        }
    }
    Handshake::Closed
}

fn join_error_notice(error: &HubError) -> ErrorNotice {
    let code = match error {
        HubError::Connect(ConnectError::InvalidName) => ErrorCode::InvalidName,
        HubError::Connect(ConnectError::CapacityExceeded(_)) => ErrorCode::CapacityExceeded,
        HubError::SendMessage(_) | HubError::Closed => ErrorCode::ServerUnavailable,
    };
    ErrorNotice::new(code, error.to_string())
}

/// エラーを通知してからソケットを閉じる
async fn reject(sender: &mut SplitSink<WebSocket, Message>, notice: ErrorNotice) {
    if let Some(json) = encode(ServerEvent::Error(notice))
        && let Err(e) = sender.send(Message::Text(json.into())).await
    {
        tracing::debug!("Failed to send rejection: {}", e);
        return;
    }
    if let Err(e) = sender.send(Message::Close(None)).await {
        tracing::debug!("Failed to send close frame: {}", e);
    }
}

fn encode(event: ServerEvent) -> Option<String> {
    let kind = event.kind();
    match serde_json::to_string(&ServerEventDto::from(event)) {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::error!("Failed to serialize {} event: {}", kind, e);
            None
        }
    }
}

/// Spawns a task that drains the connection's queue into the WebSocket sender.
///
/// # Arguments
///
/// * `rx` - The connection's outbound queue, fed by the hub
/// * `sender` - WebSocket sink to send frames to this client
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<ServerEvent>,
    mut sender: SplitSink<WebSocket, Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let Some(json) = encode(event) else {
                continue;
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Spawns a task that forwards client frames to the hub.
///
/// Errors caused by this connection are pushed to its own queue via `own_queue`,
/// so they are ordered with everything else the hub sends it.
fn receive_loop(
    mut receiver: SplitStream<WebSocket>,
    hub: HubHandle,
    connection_id: ConnectionId,
    own_queue: PusherChannel,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let notify = |code: ErrorCode, message: String| {
            if own_queue
                .send(ServerEvent::Error(ErrorNotice::new(code, message)))
                .is_err()
            {
                tracing::debug!("Queue of '{}' is closed", connection_id);
            }
        };

        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", connection_id, e);
                    break;
                }
            };

            let text = match msg {
                Message::Text(text) => text,
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id);
                    break;
                }
                _ => continue,
            };

            let event = match serde_json::from_str::<ClientEventDto>(&text) {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!("Malformed frame from '{}': {}", connection_id, e);
                    notify(ErrorCode::ProtocolViolation, format!("malformed frame: {}", e));
                    continue;
                }
            };
            tracing::debug!("Received {} from '{}'", event.kind(), connection_id);

            match event {
                ClientEventDto::Send { text } => match hub.send(connection_id, text).await {
                    Ok(_) => {}
                    Err(HubError::SendMessage(e @ SendMessageError::EmptyMessage)) => {
                        notify(ErrorCode::EmptyMessage, e.to_string());
                    }
                    Err(HubError::SendMessage(e @ SendMessageError::UnknownConnection(_))) => {
                        notify(ErrorCode::UnknownConnection, e.to_string());
                    }
                    Err(HubError::Closed) => {
                        tracing::warn!("Chat hub stopped, closing '{}'", connection_id);
                        break;
                    }
                    Err(e @ HubError::Connect(_)) => {
                        tracing::warn!("Unexpected error on send: {}", e);
                    }
                },
                ClientEventDto::Typing => hub.typing(connection_id),
                ClientEventDto::StopTyping => hub.stop_typing(connection_id),
                ClientEventDto::Join { .. } => {
                    notify(
                        ErrorCode::ProtocolViolation,
                        "already joined".to_string(),
                    );
                }
            }
        }
    })
}
