//! WebSocket frame DTOs.
//!
//! Every frame is a JSON object tagged by `type` in kebab-case, e.g.
//! `{"type":"roster-update","names":["alice"],"count":1}`.

use serde::{Deserialize, Serialize};

/// Frames sent by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientEventDto {
    /// Must be the first frame of a connection
    Join { name: String },
    Send { text: String },
    Typing,
    StopTyping,
}

impl ClientEventDto {
    pub fn kind(&self) -> &'static str {
        match self {
            ClientEventDto::Join { .. } => "join",
            ClientEventDto::Send { .. } => "send",
            ClientEventDto::Typing => "typing",
            ClientEventDto::StopTyping => "stop-typing",
        }
    }
}

/// Frames sent by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEventDto {
    History {
        messages: Vec<ChatMessageDto>,
    },
    Joined {
        name: String,
    },
    Left {
        name: String,
    },
    RosterUpdate {
        names: Vec<String>,
        count: usize,
    },
    Message {
        sender_name: String,
        text: String,
        /// Server-assigned Unix timestamp (milliseconds)
        timestamp: i64,
    },
    Typing {
        name: String,
    },
    StopTyping,
    Error {
        code: ErrorCodeDto,
        message: String,
    },
}

/// A chat message inside a `history` frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessageDto {
    pub sender_name: String,
    pub text: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCodeDto {
    InvalidName,
    EmptyMessage,
    CapacityExceeded,
    ProtocolViolation,
    UnknownConnection,
    ServerUnavailable,
}

impl ErrorCodeDto {
    /// Whether the server refuses to admit the connection with this code
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            ErrorCodeDto::InvalidName
                | ErrorCodeDto::CapacityExceeded
                | ErrorCodeDto::ServerUnavailable
        )
    }
}
