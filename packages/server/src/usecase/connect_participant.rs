//! UseCase: 参加者接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() メソッド
//! - 参加者の接続処理（表示名検証、レジストリ登録、履歴リプレイ、参加通知）
//!
//! ### なぜこのテストが必要か
//! - 新規参加者が観測する順序（history → roster-update）を保証する
//! - 空白のみの表示名を拒否し、レジストリに残さないことを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規参加者の接続、履歴がある状態での接続
//! - 異常系：空白の表示名、接続数の上限超過
//! - エッジケース：同じ表示名での複数接続

use std::sync::Arc;

use pika_shared::time::Clock;

use crate::domain::{
    Connection, ConnectionId, ConnectionRepository, DisplayName, HistoryRepository, MessagePusher,
    PusherChannel, RepositoryError, ServerEvent, Timestamp,
};

use super::{error::ConnectError, presence::PresenceBroadcaster};

/// 参加者接続のユースケース（Connection Registry の admit）
pub struct ConnectParticipantUseCase {
    /// Connection Registry
    connections: Arc<dyn ConnectionRepository>,
    /// History Store
    history: Arc<dyn HistoryRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    presence: PresenceBroadcaster,
    clock: Arc<dyn Clock>,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(
        connections: Arc<dyn ConnectionRepository>,
        history: Arc<dyn HistoryRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let presence = PresenceBroadcaster::new(connections.clone(), message_pusher.clone());
        Self {
            connections,
            history,
            message_pusher,
            presence,
            clock,
        }
    }

    /// 参加者接続を実行
    ///
    /// # Arguments
    ///
    /// * `display_name` - クライアントが指定した表示名（トリム前）
    /// * `sender` - クライアントへのイベント送信用キュー
    ///
    /// # Returns
    ///
    /// * `Ok(Connection)` - 接続成功（接続 ID が割り当てられた Connection）
    /// * `Err(ConnectError)` - 接続失敗（レジストリには何も残らない）
    pub async fn execute(
        &self,
        display_name: String,
        sender: PusherChannel,
    ) -> Result<Connection, ConnectError> {
        // 1. 表示名の検証
        let display_name =
            DisplayName::new(display_name).map_err(|_| ConnectError::InvalidName)?;

        // 2. Repository 経由でレジストリに登録
        let connection = Connection::new(
            ConnectionId::generate(),
            display_name,
            Timestamp::new(self.clock.now_millis()),
        );
        self.connections
            .add(connection.clone())
            .await
            .map_err(|e| match e {
                RepositoryError::CapacityExceeded(max) => ConnectError::CapacityExceeded(max),
            })?;

        // 3. MessagePusher に送信キューを登録
        self.message_pusher
            .register_client(connection.id, sender)
            .await;

        // 4. 履歴のリプレイ（この接続のみ、ライブのイベントより前）
        self.replay_history(&connection.id).await;

        // 5. 参加通知と Roster 配信
        self.presence.announce_joined(&connection).await;

        Ok(connection)
    }

    /// 保持している履歴を 1 つの接続にだけ送信
    pub async fn replay_history(&self, connection_id: &ConnectionId) {
        let messages = self.history.snapshot().await;
        let count = messages.len();
        match self
            .message_pusher
            .push_to(connection_id, ServerEvent::History(messages))
            .await
        {
            Ok(()) => tracing::debug!(
                "Replayed {} message(s) to connection '{}'",
                count,
                connection_id
            ),
            Err(e) => tracing::warn!(
                "Failed to replay history to connection '{}': {}",
                connection_id,
                e
            ),
        }
    }
}
