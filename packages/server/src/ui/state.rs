//! Shared application state.

use std::sync::Arc;

use crate::usecase::{GetHistoryUseCase, GetRosterUseCase, HubHandle};

/// Shared application state
pub struct AppState {
    /// ChatHub への送信口（状態変更は全てここを経由する）
    pub hub: HubHandle,
    /// GetRosterUseCase（参加者一覧取得のユースケース）
    pub get_roster_usecase: Arc<GetRosterUseCase>,
    /// GetHistoryUseCase（履歴取得のユースケース）
    pub get_history_usecase: Arc<GetHistoryUseCase>,
}
