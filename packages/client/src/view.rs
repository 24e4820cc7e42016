//! Turns server frames into display lines for one session.

use pika_server::infrastructure::dto::websocket::ServerEventDto;

use crate::{error::ClientError, formatter::MessageFormatter};

/// Per-session display state
pub struct SessionView {
    own_name: String,
    /// `history` is the first frame of an admitted connection
    admitted: bool,
}

impl SessionView {
    pub fn new(own_name: &str) -> Self {
        Self {
            own_name: own_name.to_string(),
            admitted: false,
        }
    }

    pub fn is_admitted(&self) -> bool {
        self.admitted
    }

    /// Render a server frame.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(line))` - text to print
    /// * `Ok(None)` - nothing to print
    /// * `Err(ClientError::Rejected)` - the server refused to admit us
    pub fn render(&mut self, event: ServerEventDto) -> Result<Option<String>, ClientError> {
        let line = match event {
            ServerEventDto::History { messages } => {
                self.admitted = true;
                MessageFormatter::format_history(&messages, &self.own_name)
            }
            ServerEventDto::Joined { name } => Some(MessageFormatter::format_joined(&name)),
            ServerEventDto::Left { name } => Some(MessageFormatter::format_left(&name)),
            ServerEventDto::RosterUpdate { names, count } => {
                Some(MessageFormatter::format_roster(&names, count))
            }
            // The server never echoes our own messages, so live ones are always someone else's
            ServerEventDto::Message {
                sender_name,
                text,
                timestamp,
            } => Some(MessageFormatter::format_chat_message(
                &sender_name,
                &text,
                timestamp,
            )),
            ServerEventDto::Typing { name } => Some(MessageFormatter::format_typing(&name)),
            ServerEventDto::StopTyping => None,
            ServerEventDto::Error { code, message } => {
                if !self.admitted || code.is_rejection() {
                    return Err(ClientError::Rejected { code, message });
                }
                Some(MessageFormatter::format_error(code, &message))
            }
        };
        Ok(line)
    }
}
