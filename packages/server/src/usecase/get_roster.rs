//! UseCase: 参加者一覧取得

use std::sync::Arc;

use crate::domain::{ConnectionRepository, Roster};

/// 参加者一覧取得のユースケース
pub struct GetRosterUseCase {
    connections: Arc<dyn ConnectionRepository>,
}

impl GetRosterUseCase {
    pub fn new(connections: Arc<dyn ConnectionRepository>) -> Self {
        Self { connections }
    }

    /// 現在の Roster を参加順で取得
    pub async fn execute(&self) -> Roster {
        Roster::new(self.connections.list_names().await)
    }
}
