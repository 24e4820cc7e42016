//! WebSocket client session management.

use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use pika_server::infrastructure::dto::websocket::{ClientEventDto, ServerEventDto};
use pika_shared::time::now_millis;
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};

use crate::{
    error::ClientError,
    formatter::MessageFormatter,
    typing::{TYPING_IDLE, TypingDebouncer, TypingSignal},
    ui::{InputSignal, print_line},
    view::SessionView,
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsWriter = SplitSink<WsStream, Message>;
type WsReader = SplitStream<WsStream>;

/// Run one WebSocket client session.
///
/// # Returns
///
/// * `Ok(())` - the user asked to exit
/// * `Err(ClientError::ConnectionLost)` - the connection dropped after admission
/// * `Err(ClientError)` - the connection failed before admission or was refused
pub async fn run_client_session(
    url: &str,
    name: &str,
    input: &mut mpsc::UnboundedReceiver<InputSignal>,
) -> Result<(), ClientError> {
    let (ws_stream, _) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
    let (mut write, mut read) = ws_stream.split();

    send_frame(
        &mut write,
        &ClientEventDto::Join {
            name: name.to_string(),
        },
    )
    .await?;
    tracing::info!("Connected to chat server!");

    let mut view = SessionView::new(name);
    let result = drive_session(&mut write, &mut read, &mut view, name, input).await;
    result.map_err(|e| classify_session_error(&view, e))
}

/// A failure after `history` arrived is a lost connection, not a failed attempt
fn classify_session_error(view: &SessionView, error: ClientError) -> ClientError {
    match error {
        ClientError::ConnectionError(reason) if view.is_admitted() => {
            ClientError::ConnectionLost(reason)
        }
        other => other,
    }
}

async fn drive_session(
    write: &mut WsWriter,
    read: &mut WsReader,
    view: &mut SessionView,
    name: &str,
    input: &mut mpsc::UnboundedReceiver<InputSignal>,
) -> Result<(), ClientError> {
    let (typing_tx, mut typing_rx) = mpsc::unbounded_channel();
    let mut debouncer = TypingDebouncer::new(typing_tx, TYPING_IDLE);

    loop {
        tokio::select! {
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<ServerEventDto>(&text) {
                        Ok(event) => {
                            let was_admitted = view.is_admitted();
                            if let Some(line) = view.render(event)? {
                                print_line(&line, name);
                            }
                            if !was_admitted && view.is_admitted() {
                                println!(
                                    "\nYou are '{}'. Type messages and press Enter to send. Press Ctrl+C to exit.\n",
                                    name
                                );
                            }
                        }
                        Err(e) => tracing::warn!("Unrecognized frame from server: {}", e),
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!("Server closed the connection");
                    return Err(ClientError::ConnectionError(
                        "server closed the connection".to_string(),
                    ));
                }
                Some(Err(e)) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    return Err(ClientError::ConnectionError(e.to_string()));
                }
                Some(Ok(_)) => {}
            },
            signal = input.recv() => match signal {
                Some(InputSignal::Keystroke) => debouncer.on_input(),
                Some(InputSignal::Line(line)) => {
                    debouncer.on_submit();
                    // stop-typing goes out before the message
                    while let Ok(signal) = typing_rx.try_recv() {
                        send_frame(write, &typing_frame(signal)).await?;
                    }
                    if line.trim().is_empty() {
                        continue;
                    }
                    let own_line = MessageFormatter::format_own_message(&line, now_millis());
                    send_frame(write, &ClientEventDto::Send { text: line }).await?;
                    // The server does not echo our own messages back
                    print_line(&own_line, name);
                }
                Some(InputSignal::Exit) | None => {
                    debouncer.cancel();
                    let _ = write.close().await;
                    return Ok(());
                }
            },
            Some(signal) = typing_rx.recv() => {
                send_frame(write, &typing_frame(signal)).await?;
            }
        }
    }
}

fn typing_frame(signal: TypingSignal) -> ClientEventDto {
    match signal {
        TypingSignal::Typing => ClientEventDto::Typing,
        TypingSignal::StopTyping => ClientEventDto::StopTyping,
    }
}

async fn send_frame(write: &mut WsWriter, frame: &ClientEventDto) -> Result<(), ClientError> {
    let json = serde_json::to_string(frame)
        .map_err(|e| ClientError::ConnectionError(format!("failed to encode frame: {}", e)))?;
    write
        .send(Message::text(json))
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))
}
