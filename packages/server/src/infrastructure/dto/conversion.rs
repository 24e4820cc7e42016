//! Conversion logic from domain entities to DTOs.

use pika_shared::time::timestamp_to_rfc3339;

use crate::domain::{ChatMessage, DisplayName, ErrorCode, Roster, ServerEvent};
use crate::infrastructure::dto::{http, websocket as ws};

// ========================================
// Domain Entity → WebSocket DTO
// ========================================

impl From<ChatMessage> for ws::ChatMessageDto {
    fn from(model: ChatMessage) -> Self {
        Self {
            sender_name: model.sender_name.into_string(),
            text: model.text.into_string(),
            timestamp: model.timestamp.value(),
        }
    }
}

impl From<ErrorCode> for ws::ErrorCodeDto {
    fn from(code: ErrorCode) -> Self {
        match code {
            ErrorCode::InvalidName => Self::InvalidName,
            ErrorCode::EmptyMessage => Self::EmptyMessage,
            ErrorCode::CapacityExceeded => Self::CapacityExceeded,
            ErrorCode::ProtocolViolation => Self::ProtocolViolation,
            ErrorCode::UnknownConnection => Self::UnknownConnection,
            ErrorCode::ServerUnavailable => Self::ServerUnavailable,
        }
    }
}

impl From<ServerEvent> for ws::ServerEventDto {
    fn from(event: ServerEvent) -> Self {
        match event {
            ServerEvent::History(messages) => Self::History {
                messages: messages.into_iter().map(Into::into).collect(),
            },
            ServerEvent::Joined(name) => Self::Joined {
                name: name.into_string(),
            },
            ServerEvent::Left(name) => Self::Left {
                name: name.into_string(),
            },
            ServerEvent::RosterUpdate(roster) => {
                let count = roster.count();
                Self::RosterUpdate {
                    names: names_to_strings(roster.into_names()),
                    count,
                }
            }
            ServerEvent::Message(message) => Self::Message {
                sender_name: message.sender_name.into_string(),
                text: message.text.into_string(),
                timestamp: message.timestamp.value(),
            },
            ServerEvent::Typing(name) => Self::Typing {
                name: name.into_string(),
            },
            ServerEvent::StopTyping => Self::StopTyping,
            ServerEvent::Error(notice) => Self::Error {
                code: notice.code.into(),
                message: notice.message,
            },
        }
    }
}

// ========================================
// Domain Entity → HTTP DTO
// ========================================

impl From<Roster> for http::RosterDto {
    fn from(roster: Roster) -> Self {
        let count = roster.count();
        Self {
            names: names_to_strings(roster.into_names()),
            count,
        }
    }
}

impl From<ChatMessage> for http::HistoryEntryDto {
    fn from(model: ChatMessage) -> Self {
        let timestamp = model.timestamp.value();
        Self {
            sender_name: model.sender_name.into_string(),
            text: model.text.into_string(),
            timestamp,
            sent_at: timestamp_to_rfc3339(timestamp),
        }
    }
}

fn names_to_strings(names: Vec<DisplayName>) -> Vec<String> {
    names.into_iter().map(DisplayName::into_string).collect()
}
