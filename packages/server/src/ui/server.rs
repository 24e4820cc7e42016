//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::usecase::{GetHistoryUseCase, GetRosterUseCase, HubHandle};

use super::{
    handler::{get_history, get_roster, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket chat server
///
/// # Example
///
/// ```ignore
/// let server = bootstrap::build_server(&HubOptions::default());
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// ChatHub への送信口
    hub: HubHandle,
    /// GetRosterUseCase（参加者一覧取得のユースケース）
    get_roster_usecase: Arc<GetRosterUseCase>,
    /// GetHistoryUseCase（履歴取得のユースケース）
    get_history_usecase: Arc<GetHistoryUseCase>,
}

impl Server {
    pub fn new(
        hub: HubHandle,
        get_roster_usecase: Arc<GetRosterUseCase>,
        get_history_usecase: Arc<GetHistoryUseCase>,
    ) -> Self {
        Self {
            hub,
            get_roster_usecase,
            get_history_usecase,
        }
    }

    /// Build the axum router
    pub fn router(self) -> Router {
        let app_state = Arc::new(AppState {
            hub: self.hub,
            get_roster_usecase: self.get_roster_usecase,
            get_history_usecase: self.get_history_usecase,
        });

        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/roster", get(get_roster))
            .route("/api/history", get(get_history))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Run the WebSocket chat server until Ctrl+C / SIGTERM
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(
        self,
        host: String,
        port: u16,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(
        self,
        listener: TcpListener,
        shutdown: F,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::info!(
            "WebSocket chat server listening on {}",
            listener.local_addr()?
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
