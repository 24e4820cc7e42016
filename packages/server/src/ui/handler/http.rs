//! HTTP API endpoint handlers.
//!
//! 読み取り専用。レジストリと履歴のスナップショットを返すだけで、ChatHub は経由しない。

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    infrastructure::dto::http::{HistoryEntryDto, RosterDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get the current roster in join order
pub async fn get_roster(State(state): State<Arc<AppState>>) -> Json<RosterDto> {
    let roster = state.get_roster_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(RosterDto::from(roster))
}

/// Get the retained chat history, oldest first
pub async fn get_history(State(state): State<Arc<AppState>>) -> Json<Vec<HistoryEntryDto>> {
    let history = state.get_history_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(history.into_iter().map(HistoryEntryDto::from).collect())
}
