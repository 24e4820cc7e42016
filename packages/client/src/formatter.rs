//! Message formatting utilities for client display.

use pika_server::infrastructure::dto::websocket::{ChatMessageDto, ErrorCodeDto};
use pika_shared::time::format_clock_time;

/// Label used for the local user's own messages
const SELF_LABEL: &str = "You";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a chat message line, e.g. `[14:03] bob: hi`
    pub fn format_chat_message(sender: &str, text: &str, timestamp: i64) -> String {
        format!("[{}] {}: {}", format_clock_time(timestamp), sender, text)
    }

    /// Format a line the local user just submitted
    pub fn format_own_message(text: &str, timestamp: i64) -> String {
        Self::format_chat_message(SELF_LABEL, text, timestamp)
    }

    /// Format the replayed history, labelling the local user's messages as "You"
    ///
    /// # Returns
    ///
    /// `None` when there is nothing to replay
    pub fn format_history(messages: &[ChatMessageDto], own_name: &str) -> Option<String> {
        if messages.is_empty() {
            return None;
        }
        let lines: Vec<String> = messages
            .iter()
            .map(|m| {
                let sender = if m.sender_name == own_name {
                    SELF_LABEL
                } else {
                    m.sender_name.as_str()
                };
                Self::format_chat_message(sender, &m.text, m.timestamp)
            })
            .collect();
        Some(lines.join("\n"))
    }

    pub fn format_joined(name: &str) -> String {
        format!("* {} joined the chat", name)
    }

    pub fn format_left(name: &str) -> String {
        format!("* {} left the chat", name)
    }

    /// Format the roster, e.g. `* 2 online: alice, bob`
    pub fn format_roster(names: &[String], count: usize) -> String {
        if names.is_empty() {
            return format!("* {} online", count);
        }
        format!("* {} online: {}", count, names.join(", "))
    }

    pub fn format_typing(name: &str) -> String {
        format!("{} is typing...", name)
    }

    pub fn format_error(code: ErrorCodeDto, message: &str) -> String {
        format!("! {}: {}", error_code_label(code), message)
    }
}

fn error_code_label(code: ErrorCodeDto) -> &'static str {
    match code {
        ErrorCodeDto::InvalidName => "invalid name",
        ErrorCodeDto::EmptyMessage => "empty message",
        ErrorCodeDto::CapacityExceeded => "server is full",
        ErrorCodeDto::ProtocolViolation => "protocol violation",
        ErrorCodeDto::UnknownConnection => "not connected",
        ErrorCodeDto::ServerUnavailable => "server unavailable",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMESTAMP: i64 = 1672531200000;

    fn message(sender: &str, text: &str) -> ChatMessageDto {
        ChatMessageDto {
            sender_name: sender.to_string(),
            text: text.to_string(),
            timestamp: TIMESTAMP,
        }
    }

    #[test]
    fn test_format_chat_message() {
        // テスト項目: 時刻・送信者・本文が 1 行にフォーマットされる
        // given (前提条件):
        let clock = format_clock_time(TIMESTAMP);

        // when (操作):
        let result = MessageFormatter::format_chat_message("bob", "hi", TIMESTAMP);

        // then (期待する結果):
        assert_eq!(result, format!("[{}] bob: hi", clock));
    }

    #[test]
    fn test_format_own_message_uses_self_label() {
        // テスト項目: 自分の送信は "You" として表示される
        // given (前提条件):

        // when (操作):
        let result = MessageFormatter::format_own_message("hello", TIMESTAMP);

        // then (期待する結果):
        assert!(result.ends_with("] You: hello"));
    }

    #[test]
    fn test_format_history_labels_own_messages() {
        // テスト項目: 履歴のうち自分の表示名のメッセージは "You" として表示される
        // given (前提条件):
        let messages = vec![message("alice", "one"), message("bob", "two")];

        // when (操作):
        let result = MessageFormatter::format_history(&messages, "alice").unwrap();

        // then (期待する結果):
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("] You: one"));
        assert!(lines[1].ends_with("] bob: two"));
    }

    #[test]
    fn test_format_history_empty() {
        // テスト項目: 履歴が空の場合は何も表示しない
        // given (前提条件):
        let messages = vec![];

        // when (操作):
        let result = MessageFormatter::format_history(&messages, "alice");

        // then (期待する結果):
        assert_eq!(result, None);
    }

    #[test]
    fn test_format_presence() {
        // テスト項目: 参加・退出通知が正しくフォーマットされる
        // given (前提条件):
        let name = "bob";

        // when (操作):
        let joined = MessageFormatter::format_joined(name);
        let left = MessageFormatter::format_left(name);

        // then (期待する結果):
        assert_eq!(joined, "* bob joined the chat");
        assert_eq!(left, "* bob left the chat");
    }

    #[test]
    fn test_format_roster() {
        // テスト項目: 参加者一覧が人数と名前付きでフォーマットされる
        // given (前提条件):
        let names = vec!["alice".to_string(), "bob".to_string()];

        // when (操作):
        let result = MessageFormatter::format_roster(&names, 2);

        // then (期待する結果):
        assert_eq!(result, "* 2 online: alice, bob");
    }

    #[test]
    fn test_format_typing_and_error() {
        // テスト項目: 入力中表示とエラー表示がフォーマットされる
        // given (前提条件):

        // when (操作):
        let typing = MessageFormatter::format_typing("bob");
        let error = MessageFormatter::format_error(ErrorCodeDto::EmptyMessage, "blank");

        // then (期待する結果):
        assert_eq!(typing, "bob is typing...");
        assert_eq!(error, "! empty message: blank");
    }
}
