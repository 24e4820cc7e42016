//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// `GET /api/roster`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterDto {
    /// Display names in join order
    pub names: Vec<String>,
    pub count: usize,
}

/// One entry of `GET /api/history`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntryDto {
    pub sender_name: String,
    pub text: String,
    /// Unix timestamp (milliseconds)
    pub timestamp: i64,
    /// `timestamp` in RFC 3339 (UTC)
    pub sent_at: String,
}
