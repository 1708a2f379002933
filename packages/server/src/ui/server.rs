//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::domain::{EventPusher, TokenVerifier};
use crate::usecase::{
    DisconnectUseCase, GroupQueryUseCase, JoinGroupUseCase, SendMessageUseCase, SetTypingUseCase,
};

use super::{
    handler::{group_detail, group_messages, health_check, list_groups, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Group messaging coordinator server
///
/// This struct encapsulates the server configuration and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     join_group_usecase,
///     send_message_usecase,
///     set_typing_usecase,
///     disconnect_usecase,
///     group_query_usecase,
///     pusher,
///     verifier,
/// );
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// JoinGroupUseCase（グループ参加のユースケース）
    join_group_usecase: Arc<JoinGroupUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    send_message_usecase: Arc<SendMessageUseCase>,
    /// SetTypingUseCase（タイピング状態更新のユースケース）
    set_typing_usecase: Arc<SetTypingUseCase>,
    /// DisconnectUseCase（切断処理のユースケース）
    disconnect_usecase: Arc<DisconnectUseCase>,
    /// GroupQueryUseCase（グループ参照のユースケース）
    group_query_usecase: Arc<GroupQueryUseCase>,
    /// EventPusher（イベント配信の抽象化）
    pusher: Arc<dyn EventPusher>,
    /// TokenVerifier（認証の抽象化）
    verifier: Arc<dyn TokenVerifier>,
}

impl Server {
    /// Create a new Server instance
    pub fn new(
        join_group_usecase: Arc<JoinGroupUseCase>,
        send_message_usecase: Arc<SendMessageUseCase>,
        set_typing_usecase: Arc<SetTypingUseCase>,
        disconnect_usecase: Arc<DisconnectUseCase>,
        group_query_usecase: Arc<GroupQueryUseCase>,
        pusher: Arc<dyn EventPusher>,
        verifier: Arc<dyn TokenVerifier>,
    ) -> Self {
        Self {
            join_group_usecase,
            send_message_usecase,
            set_typing_usecase,
            disconnect_usecase,
            group_query_usecase,
            pusher,
            verifier,
        }
    }

    /// Build the axum router for this server.
    ///
    /// Exposed separately from `run` so tests can serve the router on an
    /// ephemeral port.
    pub fn router(self) -> Router {
        let app_state = Arc::new(AppState {
            join_group_usecase: self.join_group_usecase,
            send_message_usecase: self.send_message_usecase,
            set_typing_usecase: self.set_typing_usecase,
            disconnect_usecase: self.disconnect_usecase,
            group_query_usecase: self.group_query_usecase,
            pusher: self.pusher,
            verifier: self.verifier,
        });

        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/groups", get(list_groups))
            .route("/api/groups/{group_id}", get(group_detail))
            .route("/api/groups/{group_id}/messages", get(group_messages))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Run the group messaging coordinator server
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
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!(
            "Group messaging coordinator listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
