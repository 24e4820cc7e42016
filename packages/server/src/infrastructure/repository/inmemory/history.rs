//! InMemory History Repository 実装
//!
//! `VecDeque` を使い、上限設定時は古いメッセージから破棄します（追加は O(1)）。

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChatMessage, HistoryRepository};

/// インメモリ History Repository 実装
#[derive(Default)]
pub struct InMemoryHistoryRepository {
    messages: Mutex<VecDeque<ChatMessage>>,
    /// 保持上限（`None` は無制限）
    capacity: Option<usize>,
}

impl InMemoryHistoryRepository {
    /// 無制限の InMemoryHistoryRepository を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 保持上限付きで作成
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            messages: Mutex::new(VecDeque::new()),
            capacity,
        }
    }
}

#[async_trait]
impl HistoryRepository for InMemoryHistoryRepository {
    async fn append(&self, message: ChatMessage) {
        let mut messages = self.messages.lock().await;
        messages.push_back(message);
        if let Some(capacity) = self.capacity {
            while messages.len() > capacity {
                messages.pop_front();
            }
        }
    }

    async fn snapshot(&self) -> Vec<ChatMessage> {
        self.messages.lock().await.iter().cloned().collect()
    }

    async fn count(&self) -> usize {
        self.messages.lock().await.len()
    }

    fn capacity(&self) -> Option<usize> {
        self.capacity
    }
}
