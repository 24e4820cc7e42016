//! UseCase: メッセージ送信処理（Message Relay）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - サーバー時刻の付与、履歴への追加、送信者以外へのブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 送信者には自分のメッセージが返らないこと（クライアント側でローカル表示するため）
//! - 全ての受信者が同じ順序でメッセージを観測すること
//! - 空白のみのメッセージがブロードキャストも履歴追加もされないこと
//!
//! ### どのような状況を想定しているか
//! - 正常系：メッセージ送信とブロードキャスト
//! - 異常系：空メッセージ、未登録の接続からの送信
//! - エッジケース：送信者のみが接続している場合（ブロードキャスト対象なし）

use std::sync::Arc;

use pika_shared::time::Clock;

use crate::domain::{
    ChatMessage, ConnectionId, ConnectionRepository, HistoryRepository, MessagePusher,
    MessageText, ServerEvent, Timestamp,
};

use super::error::SendMessageError;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Connection Registry
    connections: Arc<dyn ConnectionRepository>,
    /// History Store
    history: Arc<dyn HistoryRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(
        connections: Arc<dyn ConnectionRepository>,
        history: Arc<dyn HistoryRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            connections,
            history,
            message_pusher,
            clock,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 送信者の接続 ID
    /// * `text` - クライアントが送った本文（トリム前）
    ///
    /// # Returns
    ///
    /// * `Ok(ChatMessage)` - 履歴に追加され、ブロードキャストされたメッセージ
    /// * `Err(SendMessageError)` - 送信失敗（誰にも配信されない）
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        text: String,
    ) -> Result<ChatMessage, SendMessageError> {
        // 1. 送信者の確認
        let sender = self
            .connections
            .find(connection_id)
            .await
            .ok_or(SendMessageError::UnknownConnection(*connection_id))?;

        // 2. 本文の検証
        let text = MessageText::new(text).map_err(|_| SendMessageError::EmptyMessage)?;

        // 3. サーバー時刻を付与して履歴に追加
        let message = ChatMessage::new(
            sender.display_name,
            text,
            Timestamp::new(self.clock.now_millis()),
        );
        self.history.append(message.clone()).await;

        // 4. 送信者以外の全員にブロードキャスト
        let targets = self.get_broadcast_targets(connection_id).await;
        let recipients = targets.len();
        if let Err(e) = self
            .message_pusher
            .broadcast(targets, ServerEvent::Message(message.clone()))
            .await
        {
            tracing::warn!("Failed to broadcast message: {}", e);
        }
        tracing::debug!(
            "Relayed message from '{}' to {} recipient(s)",
            message.sender_name,
            recipients
        );

        Ok(message)
    }

    /// ブロードキャスト対象（送信者以外の全ての接続、参加順）
    async fn get_broadcast_targets(&self, exclude: &ConnectionId) -> Vec<ConnectionId> {
        self.connections
            .list_connections()
            .await
            .into_iter()
            .map(|c| c.id)
            .filter(|id| id != exclude)
            .collect()
    }
}
