//! UseCase: 入力中通知（Typing Router）
//!
//! 入力中 / 入力停止の通知を送信者以外の全員に転送します。
//! 状態は保持せず、届いた通知をそのまま中継するだけです。

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRepository, MessagePusher, ServerEvent};

/// 入力中通知のユースケース
pub struct NotifyTypingUseCase {
    connections: Arc<dyn ConnectionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl NotifyTypingUseCase {
    pub fn new(
        connections: Arc<dyn ConnectionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            connections,
            message_pusher,
        }
    }

    /// 入力中であることを他の参加者に通知
    ///
    /// 未登録の接続（切断直後など）からの通知は何もしない。
    pub async fn typing(&self, connection_id: &ConnectionId) {
        let Some(sender) = self.connections.find(connection_id).await else {
            tracing::debug!("Ignoring typing from unknown connection '{}'", connection_id);
            return;
        };
        self.relay(connection_id, ServerEvent::Typing(sender.display_name))
            .await;
    }

    /// 入力停止を他の参加者に通知
    pub async fn stop_typing(&self, connection_id: &ConnectionId) {
        if self.connections.find(connection_id).await.is_none() {
            tracing::debug!(
                "Ignoring stop-typing from unknown connection '{}'",
                connection_id
            );
            return;
        }
        self.relay(connection_id, ServerEvent::StopTyping).await;
    }

    async fn relay(&self, sender: &ConnectionId, event: ServerEvent) {
        let targets: Vec<ConnectionId> = self
            .connections
            .list_connections()
            .await
            .into_iter()
            .map(|c| c.id)
            .filter(|id| id != sender)
            .collect();
        let kind = event.kind();
        if let Err(e) = self.message_pusher.broadcast(targets, event).await {
            tracing::warn!("Failed to relay {}: {}", kind, e);
        }
    }
}
