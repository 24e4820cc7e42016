//! Composition root.
//!
//! Repository / MessagePusher / UseCase / ChatHub を組み立てて `Server` を返します。
//! バイナリと統合テストの両方から使います。

use std::sync::Arc;

use pika_shared::time::SystemClock;

use crate::{
    domain::HistoryRepository,
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryConnectionRepository, InMemoryHistoryRepository},
    },
    ui::Server,
    usecase::{
        ChatHub, ConnectParticipantUseCase, DisconnectParticipantUseCase, GetHistoryUseCase,
        GetRosterUseCase, NotifyTypingUseCase, SendMessageUseCase,
    },
};

/// Hub-wide limits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HubOptions {
    /// Maximum number of retained messages (`None` = unbounded)
    pub history_capacity: Option<usize>,
    /// Maximum number of simultaneous connections (`None` = unbounded)
    pub max_connections: Option<usize>,
}

/// Wire every dependency and spawn the hub event loop.
///
/// Must be called inside a tokio runtime.
pub fn build_server(options: &HubOptions) -> Server {
    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. UseCases
    // 4. ChatHub
    // 5. Server

    // 1. Create Repositories (in-memory)
    let connections = Arc::new(InMemoryConnectionRepository::with_capacity(
        options.max_connections,
    ));
    let history = Arc::new(InMemoryHistoryRepository::with_capacity(
        options.history_capacity,
    ));
    warn_if_history_unbounded(&*history);

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());
    let clock = Arc::new(SystemClock);

    // 3. Create UseCases
    let connect_participant_usecase = ConnectParticipantUseCase::new(
        connections.clone(),
        history.clone(),
        message_pusher.clone(),
        clock.clone(),
    );
    let disconnect_participant_usecase =
        DisconnectParticipantUseCase::new(connections.clone(), message_pusher.clone());
    let send_message_usecase = SendMessageUseCase::new(
        connections.clone(),
        history.clone(),
        message_pusher.clone(),
        clock,
    );
    let notify_typing_usecase = NotifyTypingUseCase::new(connections.clone(), message_pusher);
    let get_roster_usecase = Arc::new(GetRosterUseCase::new(connections));
    let get_history_usecase = Arc::new(GetHistoryUseCase::new(history));

    // 4. Start the ChatHub event loop
    let (hub, handle) = ChatHub::new(
        connect_participant_usecase,
        disconnect_participant_usecase,
        send_message_usecase,
        notify_typing_usecase,
    );
    tokio::spawn(hub.run());
    tracing::info!(
        "Chat hub configured (history capacity: {:?}, max connections: {:?})",
        options.history_capacity,
        options.max_connections
    );

    // 5. Create the server
    Server::new(handle, get_roster_usecase, get_history_usecase)
}

/// Returns `true` (and warns) when the history store has no retention cap.
fn warn_if_history_unbounded(history: &dyn HistoryRepository) -> bool {
    let unbounded = history.capacity().is_none();
    if unbounded {
        tracing::warn!(
            "History capacity is unbounded; memory grows with every message until restart"
        );
    }
    unbounded
}
