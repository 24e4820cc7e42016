//! MessagePusher trait 定義
//!
//! 接続ごとの送信キューへのイベント投入を抽象化します。
//! 実際のソケットへの書き込みは UI 層のタスクが行います。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, ServerEvent};

/// 接続ごとの送信キュー
pub type PusherChannel = mpsc::UnboundedSender<ServerEvent>;

/// MessagePusher trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続の送信キューを登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続の送信キューを登録解除
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 特定の接続にイベントを送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: ServerEvent,
    ) -> Result<(), MessagePushError>;

    /// 複数の接続にイベントを送信（`targets` の順に投入する。一部の失敗は許容）
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: ServerEvent,
    ) -> Result<(), MessagePushError>;
}
