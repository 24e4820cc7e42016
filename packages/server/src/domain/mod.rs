//! Domain 層
//!
//! Value Object・Entity・イベントと、UseCase 層が依存する抽象（Repository, MessagePusher）を定義します。

pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use entity::{ChatMessage, Connection, Roster};
pub use error::{MessagePushError, RepositoryError, ValueObjectError};
pub use event::{ErrorCode, ErrorNotice, ServerEvent};
pub use message_pusher::{MessagePusher, PusherChannel};
#[cfg(test)]
pub use message_pusher::MockMessagePusher;
pub use repository::{ConnectionRepository, HistoryRepository};
pub use value_object::{ConnectionId, DisplayName, MessageText, Timestamp};
