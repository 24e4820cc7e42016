//! InMemory Connection Repository 実装
//!
//! ドメイン層が定義する ConnectionRepository trait の具体的な実装。
//! 参加順を保つため `Vec` をインメモリ DB として使用します。

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Connection, ConnectionId, ConnectionRepository, DisplayName, RepositoryError};

/// インメモリ Connection Repository 実装
#[derive(Default)]
pub struct InMemoryConnectionRepository {
    /// 接続一覧（参加順）
    connections: Mutex<Vec<Connection>>,
    /// 接続数の上限（`None` は無制限）
    capacity: Option<usize>,
}

impl InMemoryConnectionRepository {
    /// 上限なしの InMemoryConnectionRepository を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 接続数の上限付きで作成
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            connections: Mutex::new(Vec::new()),
            capacity,
        }
    }
}

#[async_trait]
impl ConnectionRepository for InMemoryConnectionRepository {
    async fn add(&self, connection: Connection) -> Result<(), RepositoryError> {
        let mut connections = self.connections.lock().await;
        if let Some(capacity) = self.capacity
            && connections.len() >= capacity
        {
            return Err(RepositoryError::CapacityExceeded(capacity));
        }
        connections.push(connection);
        Ok(())
    }

    async fn remove(&self, connection_id: &ConnectionId) -> Option<Connection> {
        let mut connections = self.connections.lock().await;
        let index = connections.iter().position(|c| &c.id == connection_id)?;
        Some(connections.remove(index))
    }

    async fn find(&self, connection_id: &ConnectionId) -> Option<Connection> {
        let connections = self.connections.lock().await;
        connections.iter().find(|c| &c.id == connection_id).cloned()
    }

    async fn list_connections(&self) -> Vec<Connection> {
        self.connections.lock().await.clone()
    }

    async fn list_names(&self) -> Vec<DisplayName> {
        let connections = self.connections.lock().await;
        connections.iter().map(|c| c.display_name.clone()).collect()
    }

    async fn count(&self) -> usize {
        self.connections.lock().await.len()
    }
}
