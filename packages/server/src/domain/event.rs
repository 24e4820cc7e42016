//! サーバーから各接続の送信キューへ投入されるイベント定義

use super::{
    entity::{ChatMessage, Roster},
    value_object::DisplayName,
};

/// サーバー → クライアントのイベント
///
/// 接続ごとに 1 つのキューを持つ。`Error` 以外は全て ChatHub が投入し、
/// `Error` は原因となった接続にのみ送られる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// 保持している全履歴（参加直後に 1 回だけ送る）
    History(Vec<ChatMessage>),
    Joined(DisplayName),
    Left(DisplayName),
    RosterUpdate(Roster),
    Message(ChatMessage),
    Typing(DisplayName),
    StopTyping,
    Error(ErrorNotice),
}

impl ServerEvent {
    /// ログ出力用の短い名前
    pub fn kind(&self) -> &'static str {
        match self {
            ServerEvent::History(_) => "history",
            ServerEvent::Joined(_) => "joined",
            ServerEvent::Left(_) => "left",
            ServerEvent::RosterUpdate(_) => "roster-update",
            ServerEvent::Message(_) => "message",
            ServerEvent::Typing(_) => "typing",
            ServerEvent::StopTyping => "stop-typing",
            ServerEvent::Error(_) => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidName,
    EmptyMessage,
    CapacityExceeded,
    ProtocolViolation,
    UnknownConnection,
    ServerUnavailable,
}

/// 原因となった接続にのみ通知するエラー（ブロードキャストはしない）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNotice {
    pub code: ErrorCode,
    pub message: String,
}

impl ErrorNotice {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}
