//! UseCase 層
//!
//! 各操作を 1 つのユースケースとして実装し、`ChatHub` が単一のイベントループから呼び出します。

mod connect_participant;
mod disconnect_participant;
mod error;
mod get_history;
mod get_roster;
mod hub;
mod notify_typing;
mod presence;
mod send_message;

#[cfg(test)]
mod test_support;

pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{ConnectError, HubError, SendMessageError};
pub use get_history::GetHistoryUseCase;
pub use get_roster::GetRosterUseCase;
pub use hub::{ChatHub, HubCommand, HubHandle};
pub use notify_typing::NotifyTypingUseCase;
pub use presence::PresenceBroadcaster;
pub use send_message::SendMessageUseCase;
