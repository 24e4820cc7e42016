//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::ConnectionId;

/// 参加者接続のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    /// 表示名がトリム後に空
    #[error("display name must not be blank")]
    InvalidName,

    /// 接続数の上限に達している
    #[error("connection capacity of {0} reached")]
    CapacityExceeded(usize),
}

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    /// 送信元の接続が登録されていない（切断直後の競合）
    #[error("connection '{0}' is not registered")]
    UnknownConnection(ConnectionId),

    /// 本文がトリム後に空
    #[error("message text must not be blank")]
    EmptyMessage,
}

/// `HubHandle` 経由の操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HubError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error(transparent)]
    SendMessage(#[from] SendMessageError),

    /// イベントループが停止している
    #[error("chat hub is not running")]
    Closed,
}
