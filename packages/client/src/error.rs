//! Error types for the chat client.

use pika_server::infrastructure::dto::websocket::ErrorCodeDto;
use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server refused to admit this connection
    #[error("Server rejected the connection ({code:?}): {message}")]
    Rejected { code: ErrorCodeDto, message: String },

    /// Connection error before the server admitted us
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// An admitted session was dropped
    #[error("Connection lost: {0}")]
    ConnectionLost(String),
}
