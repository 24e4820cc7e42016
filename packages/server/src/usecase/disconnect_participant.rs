//! UseCase: 参加者切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - 参加者の切断処理（送信キュー解除、レジストリ削除、退出通知）
//!
//! ### なぜこのテストが必要か
//! - 切断時に残りの参加者へ left → roster-update が通知されることを保証する
//! - 二重切断で left が重複しないこと（冪等性）を保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の切断と通知
//! - エッジケース：最後の参加者の切断、同じ接続の二重切断、未知の接続 ID

use std::sync::Arc;

use crate::domain::{Connection, ConnectionId, ConnectionRepository, MessagePusher};

use super::presence::PresenceBroadcaster;

/// 参加者切断のユースケース（Connection Registry の remove）
pub struct DisconnectParticipantUseCase {
    /// Connection Registry
    connections: Arc<dyn ConnectionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    presence: PresenceBroadcaster,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(
        connections: Arc<dyn ConnectionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        let presence = PresenceBroadcaster::new(connections.clone(), message_pusher.clone());
        Self {
            connections,
            message_pusher,
            presence,
        }
    }

    /// 参加者切断を実行
    ///
    /// 冪等。未知の接続 ID（二重切断など）の場合は何も通知せず `None` を返す。
    ///
    /// # Returns
    ///
    /// * `Some(Connection)` - 削除された接続
    /// * `None` - 既に削除済み、または未登録
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<Connection> {
        // 1. 送信キューの登録解除（以降この接続にはイベントが投入されない）
        self.message_pusher.unregister_client(connection_id).await;

        // 2. Repository 経由でレジストリから削除
        let Some(removed) = self.connections.remove(connection_id).await else {
            tracing::debug!(
                "Connection '{}' already removed, nothing to announce",
                connection_id
            );
            return None;
        };

        // 3. 退出通知と Roster 配信
        self.presence.announce_left(&removed).await;

        Some(removed)
    }
}
