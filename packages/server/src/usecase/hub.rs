//! ChatHub: 単一のイベントループ
//!
//! 全ての状態変更（参加・退出・送信・入力中通知）は `HubCommand` としてキューに積まれ、
//! 1 つのタスクが順番に処理します。これにより、
//!
//! - 全ての受信者が同じ順序でメッセージを観測する
//! - 参加者から見て `history` → `roster-update` の順序が保たれる
//! - 切断と同時に届いた送信・入力中通知が半端な状態を観測しない
//!
//! が保証されます。

use tokio::sync::{mpsc, oneshot};

use crate::domain::{ChatMessage, Connection, ConnectionId, PusherChannel};

use super::{
    ConnectParticipantUseCase, DisconnectParticipantUseCase, NotifyTypingUseCase,
    SendMessageUseCase,
    error::{ConnectError, HubError, SendMessageError},
};

/// イベントループへのコマンド
#[derive(Debug)]
pub enum HubCommand {
    Join {
        display_name: String,
        sender: PusherChannel,
        reply: oneshot::Sender<Result<Connection, ConnectError>>,
    },
    Leave {
        connection_id: ConnectionId,
    },
    Send {
        connection_id: ConnectionId,
        text: String,
        reply: oneshot::Sender<Result<ChatMessage, SendMessageError>>,
    },
    Typing {
        connection_id: ConnectionId,
    },
    StopTyping {
        connection_id: ConnectionId,
    },
}

/// 状態を所有するイベントループ本体
pub struct ChatHub {
    commands: mpsc::UnboundedReceiver<HubCommand>,
    connect_participant: ConnectParticipantUseCase,
    disconnect_participant: DisconnectParticipantUseCase,
    send_message: SendMessageUseCase,
    notify_typing: NotifyTypingUseCase,
}

impl ChatHub {
    pub fn new(
        connect_participant: ConnectParticipantUseCase,
        disconnect_participant: DisconnectParticipantUseCase,
        send_message: SendMessageUseCase,
        notify_typing: NotifyTypingUseCase,
    ) -> (Self, HubHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let hub = Self {
            commands: rx,
            connect_participant,
            disconnect_participant,
            send_message,
            notify_typing,
        };
        (hub, HubHandle { commands: tx })
    }

    /// 全ての `HubHandle` が破棄されるまでコマンドを処理する
    pub async fn run(mut self) {
        tracing::info!("Chat hub started");
        while let Some(command) = self.commands.recv().await {
            self.handle(command).await;
        }
        tracing::info!("Chat hub stopped");
    }

    async fn handle(&self, command: HubCommand) {
        match command {
            HubCommand::Join {
                display_name,
                sender,
                reply,
            } => {
                let result = self.connect_participant.execute(display_name, sender).await;
                let admitted = result.as_ref().ok().map(|c| c.id);
                if reply.send(result).is_err()
                    && let Some(connection_id) = admitted
                {
                    // ハンドラーが既に終了しているので、登録したばかりの接続を片付ける
                    tracing::warn!(
                        "Join requester for '{}' went away, disconnecting",
                        connection_id
                    );
                    self.disconnect_participant.execute(&connection_id).await;
                }
            }
            HubCommand::Leave { connection_id } => {
                self.disconnect_participant.execute(&connection_id).await;
            }
            HubCommand::Send {
                connection_id,
                text,
                reply,
            } => {
                let result = self.send_message.execute(&connection_id, text).await;
                if reply.send(result).is_err() {
                    tracing::debug!("Send requester for '{}' went away", connection_id);
                }
            }
            HubCommand::Typing { connection_id } => {
                self.notify_typing.typing(&connection_id).await;
            }
            HubCommand::StopTyping { connection_id } => {
                self.notify_typing.stop_typing(&connection_id).await;
            }
        }
    }
}

/// イベントループへの送信口（接続ハンドラーごとに clone して使う）
#[derive(Debug, Clone)]
pub struct HubHandle {
    commands: mpsc::UnboundedSender<HubCommand>,
}

impl HubHandle {
    /// 参加を要求し、結果を待つ
    pub async fn join(
        &self,
        display_name: String,
        sender: PusherChannel,
    ) -> Result<Connection, HubError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(HubCommand::Join {
                display_name,
                sender,
                reply,
            })
            .map_err(|_| HubError::Closed)?;
        Ok(response.await.map_err(|_| HubError::Closed)??)
    }

    /// メッセージ送信を要求し、結果を待つ
    pub async fn send(
        &self,
        connection_id: ConnectionId,
        text: String,
    ) -> Result<ChatMessage, HubError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(HubCommand::Send {
                connection_id,
                text,
                reply,
            })
            .map_err(|_| HubError::Closed)?;
        Ok(response.await.map_err(|_| HubError::Closed)??)
    }

    /// 退出を要求（結果は待たない）
    pub fn leave(&self, connection_id: ConnectionId) {
        self.dispatch(HubCommand::Leave { connection_id });
    }

    pub fn typing(&self, connection_id: ConnectionId) {
        self.dispatch(HubCommand::Typing { connection_id });
    }

    pub fn stop_typing(&self, connection_id: ConnectionId) {
        self.dispatch(HubCommand::StopTyping { connection_id });
    }

    fn dispatch(&self, command: HubCommand) {
        if self.commands.send(command).is_err() {
            tracing::warn!("Chat hub is not running, dropping command");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ConnectionRepository, HistoryRepository, ServerEvent},
        usecase::test_support::{Fixture, drain, message_texts, name, roster},
    };
    use tokio::{sync::mpsc::UnboundedReceiver, task::JoinHandle};

    fn start(fixture: &Fixture) -> (HubHandle, JoinHandle<()>) {
        let (hub, handle) = ChatHub::new(
            fixture.connect_usecase(),
            fixture.disconnect_usecase(),
            fixture.send_usecase(),
            fixture.typing_usecase(),
        );
        (handle, tokio::spawn(hub.run()))
    }

    async fn join(
        handle: &HubHandle,
        display_name: &str,
    ) -> (Connection, UnboundedReceiver<ServerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let connection = handle.join(display_name.to_string(), tx).await.unwrap();
        (connection, rx)
    }

    /// fire-and-forget のコマンドが処理されるまで待つ
    async fn settle(handle: &HubHandle) {
        let (tx, _rx) = mpsc::unbounded_channel();
        // 不正な名前の参加要求は状態を変えずに必ず応答が返る
        let _ = handle.join(" ".to_string(), tx).await;
    }

    #[tokio::test]
    async fn test_hub_two_participants_scenario() {
        // テスト項目: 参加・入力中・送信・退出の一連の流れで各参加者が期待通りのイベントを受信する
        // given (前提条件):
        let fixture = Fixture::new();
        let (handle, _task) = start(&fixture);
        let (alice, mut alice_rx) = join(&handle, "alice").await;

        // when (操作): bob が参加
        let (bob, mut bob_rx) = join(&handle, "bob").await;

        // then (期待する結果):
        assert_eq!(
            drain(&mut alice_rx),
            vec![
                ServerEvent::History(vec![]),
                roster(&["alice"]),
                ServerEvent::Joined(name("bob")),
                roster(&["alice", "bob"]),
            ]
        );
        assert_eq!(
            drain(&mut bob_rx),
            vec![ServerEvent::History(vec![]), roster(&["alice", "bob"])]
        );

        // when (操作): alice が入力してから送信
        handle.typing(alice.id);
        handle.stop_typing(alice.id);
        let message = handle.send(alice.id, "hello".to_string()).await.unwrap();

        // then (期待する結果):
        assert_eq!(
            drain(&mut bob_rx),
            vec![
                ServerEvent::Typing(name("alice")),
                ServerEvent::StopTyping,
                ServerEvent::Message(message),
            ]
        );
        assert!(drain(&mut alice_rx).is_empty());

        // when (操作): bob が退出
        handle.leave(bob.id);
        settle(&handle).await;

        // then (期待する結果):
        assert_eq!(
            drain(&mut alice_rx),
            vec![ServerEvent::Left(name("bob")), roster(&["alice"])]
        );
    }

    #[tokio::test]
    async fn test_hub_join_rejections() {
        // テスト項目: 不正な名前と上限超過の参加要求はエラーになり、登録されない
        // given (前提条件):
        let fixture = Fixture::with_capacities(Some(1), None);
        let (handle, _task) = start(&fixture);
        let (_alice, _alice_rx) = join(&handle, "alice").await;

        // when (操作):
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let blank = handle.join("   ".to_string(), tx1).await;
        let (tx2, _rx2) = mpsc::unbounded_channel();
        let full = handle.join("bob".to_string(), tx2).await;

        // then (期待する結果):
        assert_eq!(blank, Err(HubError::Connect(ConnectError::InvalidName)));
        assert_eq!(
            full,
            Err(HubError::Connect(ConnectError::CapacityExceeded(1)))
        );
        assert_eq!(fixture.names().await, vec!["alice"]);
    }

    #[tokio::test]
    async fn test_hub_send_errors() {
        // テスト項目: 空メッセージと未登録接続からの送信はエラーとして返る
        // given (前提条件):
        let fixture = Fixture::new();
        let (handle, _task) = start(&fixture);
        let (alice, _alice_rx) = join(&handle, "alice").await;
        let unknown = ConnectionId::generate();

        // when (操作):
        let empty = handle.send(alice.id, "  ".to_string()).await;
        let orphan = handle.send(unknown, "hi".to_string()).await;

        // then (期待する結果):
        assert_eq!(
            empty,
            Err(HubError::SendMessage(SendMessageError::EmptyMessage))
        );
        assert_eq!(
            orphan,
            Err(HubError::SendMessage(SendMessageError::UnknownConnection(
                unknown
            )))
        );
        assert_eq!(fixture.history.count().await, 0);
    }

    #[tokio::test]
    async fn test_hub_replays_history_to_late_joiner() {
        // テスト項目: 後から参加した接続は、それまでの全メッセージを順番通りに受信する
        // given (前提条件):
        let fixture = Fixture::new();
        let (handle, _task) = start(&fixture);
        let (alice, _alice_rx) = join(&handle, "alice").await;
        for text in ["one", "two", "three"] {
            handle.send(alice.id, text.to_string()).await.unwrap();
        }

        // when (操作):
        let (_carol, mut carol_rx) = join(&handle, "carol").await;

        // then (期待する結果):
        let events = drain(&mut carol_rx);
        let ServerEvent::History(history) = &events[0] else {
            panic!("expected history first, got {:?}", events[0]);
        };
        assert_eq!(message_texts(history), vec!["one", "two", "three"]);
        assert_eq!(events[1], roster(&["alice", "carol"]));
    }

    #[tokio::test]
    async fn test_hub_typing_then_immediate_leave() {
        // テスト項目: 入力中通知の直後に退出しても、残りの参加者には一貫した順序で届く
        // given (前提条件):
        let fixture = Fixture::new();
        let (handle, _task) = start(&fixture);
        let (alice, mut alice_rx) = join(&handle, "alice").await;
        let (bob, _bob_rx) = join(&handle, "bob").await;
        drain(&mut alice_rx);

        // when (操作):
        handle.typing(bob.id);
        handle.leave(bob.id);
        handle.stop_typing(bob.id);
        settle(&handle).await;

        // then (期待する結果): 退出後の stop-typing は無視される
        assert_eq!(
            drain(&mut alice_rx),
            vec![
                ServerEvent::Typing(name("bob")),
                ServerEvent::Left(name("bob")),
                roster(&["alice"]),
            ]
        );
        assert!(fixture.connections.find(&bob.id).await.is_none());
        assert!(fixture.connections.find(&alice.id).await.is_some());
    }

    #[tokio::test]
    async fn test_hub_leave_is_idempotent() {
        // テスト項目: 同じ接続の退出を 2 回要求しても通知は 1 回だけ
        // given (前提条件):
        let fixture = Fixture::new();
        let (handle, _task) = start(&fixture);
        let (_alice, mut alice_rx) = join(&handle, "alice").await;
        let (bob, _bob_rx) = join(&handle, "bob").await;
        drain(&mut alice_rx);

        // when (操作):
        handle.leave(bob.id);
        handle.leave(bob.id);
        settle(&handle).await;

        // then (期待する結果):
        assert_eq!(
            drain(&mut alice_rx),
            vec![ServerEvent::Left(name("bob")), roster(&["alice"])]
        );
    }

    #[tokio::test]
    async fn test_hub_abandoned_join_is_rolled_back() {
        // テスト項目: 参加要求の応答を受け取る前に要求元が消えた場合、その接続は登録されたままにならない
        // given (前提条件):
        let fixture = Fixture::new();
        let (handle, _task) = start(&fixture);
        let (tx, _rx) = mpsc::unbounded_channel();
        let (reply, response) = oneshot::channel();
        drop(response);

        // when (操作):
        handle
            .commands
            .send(HubCommand::Join {
                display_name: "ghost".to_string(),
                sender: tx,
                reply,
            })
            .unwrap();
        settle(&handle).await;

        // then (期待する結果):
        assert_eq!(fixture.connections.count().await, 0);
    }

    #[tokio::test]
    async fn test_hub_closed_after_stop() {
        // テスト項目: イベントループ停止後の要求は Closed になる
        // given (前提条件):
        let fixture = Fixture::new();
        let (hub, handle) = ChatHub::new(
            fixture.connect_usecase(),
            fixture.disconnect_usecase(),
            fixture.send_usecase(),
            fixture.typing_usecase(),
        );
        drop(hub);

        // when (操作):
        let (tx, _rx) = mpsc::unbounded_channel();
        let joined = handle.join("alice".to_string(), tx).await;
        let sent = handle.send(ConnectionId::generate(), "hi".to_string()).await;
        handle.leave(ConnectionId::generate());

        // then (期待する結果):
        assert_eq!(joined, Err(HubError::Closed));
        assert_eq!(sent, Err(HubError::Closed));
    }
}
