//! Test fixtures shared by the use case tests.

use std::sync::Arc;

use pika_shared::time::FixedClock;
use tokio::sync::mpsc;

use crate::{
    domain::{ChatMessage, Connection, ConnectionRepository, DisplayName, ServerEvent},
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryConnectionRepository, InMemoryHistoryRepository},
    },
};

use super::{
    ConnectParticipantUseCase, DisconnectParticipantUseCase, NotifyTypingUseCase,
    PresenceBroadcaster, SendMessageUseCase,
};

pub const FIXED_TIME: i64 = 1672531200000;

/// In-memory repositories and pusher wired the same way as `bootstrap`.
pub struct Fixture {
    pub connections: Arc<InMemoryConnectionRepository>,
    pub history: Arc<InMemoryHistoryRepository>,
    pub pusher: Arc<WebSocketMessagePusher>,
    pub clock: Arc<FixedClock>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_capacities(None, None)
    }

    pub fn with_capacities(max_connections: Option<usize>, history: Option<usize>) -> Self {
        Self {
            connections: Arc::new(InMemoryConnectionRepository::with_capacity(max_connections)),
            history: Arc::new(InMemoryHistoryRepository::with_capacity(history)),
            pusher: Arc::new(WebSocketMessagePusher::new()),
            clock: Arc::new(FixedClock::new(FIXED_TIME)),
        }
    }

    pub fn presence(&self) -> PresenceBroadcaster {
        PresenceBroadcaster::new(self.connections.clone(), self.pusher.clone())
    }

    pub fn connect_usecase(&self) -> ConnectParticipantUseCase {
        ConnectParticipantUseCase::new(
            self.connections.clone(),
            self.history.clone(),
            self.pusher.clone(),
            self.clock.clone(),
        )
    }

    pub fn disconnect_usecase(&self) -> DisconnectParticipantUseCase {
        DisconnectParticipantUseCase::new(self.connections.clone(), self.pusher.clone())
    }

    pub fn send_usecase(&self) -> SendMessageUseCase {
        SendMessageUseCase::new(
            self.connections.clone(),
            self.history.clone(),
            self.pusher.clone(),
            self.clock.clone(),
        )
    }

    pub fn typing_usecase(&self) -> NotifyTypingUseCase {
        NotifyTypingUseCase::new(self.connections.clone(), self.pusher.clone())
    }

    /// Admit a connection and return it with its outbound queue.
    pub async fn admit(&self, name: &str) -> (Connection, mpsc::UnboundedReceiver<ServerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let connection = self
            .connect_usecase()
            .execute(name.to_string(), tx)
            .await
            .expect("admission should succeed");
        (connection, rx)
    }

    pub async fn names(&self) -> Vec<String> {
        self.connections
            .list_names()
            .await
            .into_iter()
            .map(DisplayName::into_string)
            .collect()
    }
}

/// Take everything currently queued without waiting.
pub fn drain(rx: &mut mpsc::UnboundedReceiver<ServerEvent>) -> Vec<ServerEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

pub fn name(value: &str) -> DisplayName {
    DisplayName::new(value.to_string()).expect("valid display name")
}

pub fn roster(names: &[&str]) -> ServerEvent {
    ServerEvent::RosterUpdate(crate::domain::Roster::new(
        names.iter().copied().map(name).collect(),
    ))
}

pub fn message_texts(messages: &[ChatMessage]) -> Vec<&str> {
    messages.iter().map(|m| m.text.as_str()).collect()
}
