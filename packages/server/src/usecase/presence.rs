//! Presence Broadcaster
//!
//! レジストリの変更（admit / remove）ごとに、presence 通知と最新の Roster を配信します。
//! 呼び出しは変更がコミットされた後に 1 回だけ行われます。

use std::sync::Arc;

use crate::domain::{
    Connection, ConnectionId, ConnectionRepository, MessagePusher, Roster, ServerEvent,
};

/// 参加・退出の通知と Roster 配信
#[derive(Clone)]
pub struct PresenceBroadcaster {
    connections: Arc<dyn ConnectionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl PresenceBroadcaster {
    pub fn new(
        connections: Arc<dyn ConnectionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            connections,
            message_pusher,
        }
    }

    /// 参加を通知
    ///
    /// 新規参加者以外に `joined` を送り、その後に新規参加者を含む全員へ Roster を送る。
    /// 既存の参加者から見ると `joined` → `roster-update` の順になる。
    pub async fn announce_joined(&self, joined: &Connection) {
        let connections = self.connections.list_connections().await;
        let others: Vec<ConnectionId> = connections
            .iter()
            .map(|c| c.id)
            .filter(|id| id != &joined.id)
            .collect();

        self.broadcast(others, ServerEvent::Joined(joined.display_name.clone()))
            .await;
        self.broadcast_roster(&connections).await;
        tracing::info!(
            "Announced join of '{}' ({} online)",
            joined.display_name,
            connections.len()
        );
    }

    /// 退出を通知
    ///
    /// 残りの参加者に `left` と Roster を送る。残りが 0 人でも Roster は計算する。
    pub async fn announce_left(&self, left: &Connection) {
        let connections = self.connections.list_connections().await;
        let remaining: Vec<ConnectionId> = connections.iter().map(|c| c.id).collect();

        self.broadcast(remaining, ServerEvent::Left(left.display_name.clone()))
            .await;
        self.broadcast_roster(&connections).await;
        tracing::info!(
            "Announced departure of '{}' ({} online)",
            left.display_name,
            connections.len()
        );
    }

    async fn broadcast_roster(&self, connections: &[Connection]) {
        let roster = Roster::from_connections(connections);
        if roster.is_empty() {
            tracing::debug!("Roster is empty, no recipients for roster-update");
        }
        let targets = connections.iter().map(|c| c.id).collect();
        self.broadcast(targets, ServerEvent::RosterUpdate(roster))
            .await;
    }

    async fn broadcast(&self, targets: Vec<ConnectionId>, event: ServerEvent) {
        let kind = event.kind();
        if let Err(e) = self.message_pusher.broadcast(targets, event).await {
            tracing::warn!("Failed to broadcast {}: {}", kind, e);
        }
    }
}
