//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! 書き込みは `ChatHub` の単一イベントループからのみ行われます。
//! 読み取り（スナップショット）は HTTP API などから並行して呼ばれても安全でなければなりません。

use async_trait::async_trait;

use super::{ChatMessage, Connection, ConnectionId, DisplayName, RepositoryError};

/// Connection Registry
///
/// ライブな接続ごとに 1 エントリを保持する。順序は参加順。
#[async_trait]
pub trait ConnectionRepository: Send + Sync {
    /// 接続を登録
    async fn add(&self, connection: Connection) -> Result<(), RepositoryError>;

    /// 接続を削除（存在しない ID の場合は `None` を返す no-op）
    async fn remove(&self, connection_id: &ConnectionId) -> Option<Connection>;

    /// 接続を取得
    async fn find(&self, connection_id: &ConnectionId) -> Option<Connection>;

    /// 全ての接続を参加順で取得
    async fn list_connections(&self) -> Vec<Connection>;

    /// 全ての表示名を参加順で取得
    async fn list_names(&self) -> Vec<DisplayName>;

    /// 接続数を取得
    async fn count(&self) -> usize;
}

/// History Store
///
/// 追記専用の順序付きログ。上限が設定されている場合は古いものから破棄する。
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// メッセージを末尾に追加
    async fn append(&self, message: ChatMessage);

    /// 保持している全メッセージを追加順で取得
    async fn snapshot(&self) -> Vec<ChatMessage>;

    /// 保持しているメッセージ数
    async fn count(&self) -> usize;

    /// 保持上限（`None` は無制限）
    fn capacity(&self) -> Option<usize>;
}
