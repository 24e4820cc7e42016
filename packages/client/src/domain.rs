//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement business logic
//! without side effects, making them easy to test.

use crate::error::ClientError;

/// Check if the client should exit immediately based on the error type.
///
/// # Returns
///
/// `true` if the server refused admission (retrying would be refused again),
/// `false` otherwise
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(error, ClientError::Rejected { .. })
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The number of failed attempts so far
/// * `max_attempts` - The maximum number of connection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    // Don't reconnect if the error requires immediate exit
    if should_exit_immediately(error) {
        return false;
    }

    // Don't reconnect if we've exhausted all attempts
    current_attempt < max_attempts
}

/// Check if the failed-attempt count should start over.
///
/// A session that was admitted and later dropped starts a new outage, so the
/// attempts spent on earlier outages no longer count.
pub fn should_reset_attempts(error: &ClientError) -> bool {
    matches!(error, ClientError::ConnectionLost(_))
}

/// Failed-attempt count after `error` ends a session.
pub fn next_failed_attempts(error: &ClientError, failed_attempts: u32) -> u32 {
    if should_reset_attempts(error) {
        1
    } else {
        failed_attempts + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pika_server::infrastructure::dto::websocket::ErrorCodeDto;

    fn rejected(code: ErrorCodeDto) -> ClientError {
        ClientError::Rejected {
            code,
            message: "rejected".to_string(),
        }
    }

    #[test]
    fn test_should_exit_immediately_when_rejected() {
        // テスト項目: 参加を拒否された場合、即座に終了すべきと判定される
        // given (前提条件):
        let errors = [
            rejected(ErrorCodeDto::InvalidName),
            rejected(ErrorCodeDto::CapacityExceeded),
            rejected(ErrorCodeDto::ServerUnavailable),
        ];

        // when (操作):
        let results: Vec<bool> = errors.iter().map(should_exit_immediately).collect();

        // then (期待する結果):
        assert_eq!(results, vec![true, true, true]);
    }

    #[test]
    fn test_should_exit_immediately_with_connection_error() {
        // テスト項目: ConnectionError の場合、即座に終了すべきではないと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let result = should_exit_immediately(&error);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_attempt_reconnect_when_rejected() {
        // テスト項目: 参加を拒否された場合、再接続すべきではないと判定される
        // given (前提条件):
        let error = rejected(ErrorCodeDto::CapacityExceeded);

        // when (操作):
        let result = should_attempt_reconnect(&error, 0, 5);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_attempt_reconnect_within_limit() {
        // テスト項目: 再接続回数が上限未満の場合、再接続すべきと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let first = should_attempt_reconnect(&error, 1, 5);
        let last = should_attempt_reconnect(&error, 4, 5);

        // then (期待する結果):
        assert!(first);
        assert!(last);
    }

    #[test]
    fn test_should_attempt_reconnect_at_limit() {
        // テスト項目: 再接続回数が上限に達した場合、再接続すべきではないと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 5, 5);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_reset_attempts_after_admitted_session() {
        // テスト項目: 参加後に切断された場合のみ試行回数がリセットされる
        // given (前提条件):
        let lost = ClientError::ConnectionLost("server closed the connection".to_string());
        let failed = ClientError::ConnectionError("connection refused".to_string());

        // when (操作):
        let lost_result = should_reset_attempts(&lost);
        let failed_result = should_reset_attempts(&failed);

        // then (期待する結果):
        assert!(lost_result);
        assert!(!failed_result);
        assert!(!should_reset_attempts(&rejected(ErrorCodeDto::InvalidName)));
    }

    #[test]
    fn test_repeated_drops_of_admitted_sessions_keep_reconnecting() {
        // テスト項目: 参加に成功したセッションが何度切断されても、毎回新しい障害として再接続を続ける
        // given (前提条件):
        let lost = ClientError::ConnectionLost("server closed the connection".to_string());
        let mut failed_attempts = 0;

        // when (操作): 参加成功後の切断を上限を超える回数繰り返す
        let mut decisions = Vec::new();
        for _ in 0..10 {
            failed_attempts = next_failed_attempts(&lost, failed_attempts);
            decisions.push(should_attempt_reconnect(&lost, failed_attempts, 5));
        }

        // then (期待する結果):
        assert_eq!(failed_attempts, 1);
        assert!(decisions.into_iter().all(|reconnect| reconnect));
    }

    #[test]
    fn test_consecutive_failed_attempts_stop_at_limit() {
        // テスト項目: 切断後に接続失敗が続くと、上限で再接続をやめる
        // given (前提条件):
        let lost = ClientError::ConnectionLost("server closed the connection".to_string());
        let failed = ClientError::ConnectionError("connection refused".to_string());
        let mut failed_attempts = next_failed_attempts(&lost, 3);

        // when (操作):
        let mut decisions = Vec::new();
        for _ in 0..4 {
            failed_attempts = next_failed_attempts(&failed, failed_attempts);
            decisions.push(should_attempt_reconnect(&failed, failed_attempts, 5));
        }

        // then (期待する結果): 切断 1 回 + 接続失敗 4 回で上限の 5 回に達する
        assert_eq!(failed_attempts, 5);
        assert_eq!(decisions, vec![true, true, true, false]);
    }
}
