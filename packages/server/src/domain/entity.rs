//! Entity 定義

use super::value_object::{ConnectionId, DisplayName, MessageText, Timestamp};

/// 接続（Connection Registry が所有する）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: ConnectionId,
    /// 接続時に一度だけ決まり、接続中は変更されない
    pub display_name: DisplayName,
    pub joined_at: Timestamp,
}

impl Connection {
    pub fn new(id: ConnectionId, display_name: DisplayName, joined_at: Timestamp) -> Self {
        Self {
            id,
            display_name,
            joined_at,
        }
    }
}

/// チャットメッセージ（生成後は不変）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender_name: DisplayName,
    pub text: MessageText,
    /// サーバーが付与した時刻
    pub timestamp: Timestamp,
}

impl ChatMessage {
    pub fn new(sender_name: DisplayName, text: MessageText, timestamp: Timestamp) -> Self {
        Self {
            sender_name,
            text,
            timestamp,
        }
    }
}

/// 参加者一覧
///
/// 保存されない派生値。レジストリの内容から都度計算する。
/// 件数は常に名前の数と一致する。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Roster {
    names: Vec<DisplayName>,
}

impl Roster {
    pub fn new(names: Vec<DisplayName>) -> Self {
        Self { names }
    }

    /// 接続一覧（参加順）から Roster を構築
    pub fn from_connections(connections: &[Connection]) -> Self {
        Self::new(
            connections
                .iter()
                .map(|connection| connection.display_name.clone())
                .collect(),
        )
    }

    pub fn names(&self) -> &[DisplayName] {
        &self.names
    }

    pub fn count(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn into_names(self) -> Vec<DisplayName> {
        self.names
    }
}
