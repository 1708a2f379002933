//! WebSocket を使った EventPusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を管理
//! - 接続へのイベント送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`src/ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、イベント送信に使用します。
//!
//! これにより、「WebSocket の生成」と「イベントの送信」が分離されます：
//! - UI 層: WebSocket 接続の受付、sender の生成
//! - Infrastructure 層: sender の管理、イベント送信
//!
//! 送信はチャネルへの enqueue であり、await しません。接続単位の
//! FIFO はチャネルと受信側の単一タスク（pusher_loop）が保証します。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, EventPushError, EventPusher, PusherChannel};

/// WebSocket を使った EventPusher 実装
///
/// ## フィールド
///
/// - `connections`: 接続中のコネクションと対応する WebSocket sender のマップ
pub struct WebSocketEventPusher {
    /// 接続中のコネクションの WebSocket sender
    ///
    /// Key: ConnectionId
    /// Value: PusherChannel
    connections: Mutex<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketEventPusher {
    /// 新しい WebSocketEventPusher を作成
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for WebSocketEventPusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPusher for WebSocketEventPusher {
    async fn register_connection(&self, conn_id: ConnectionId, sender: PusherChannel) {
        let mut connections = self.connections.lock().await;
        connections.insert(conn_id, sender);
        tracing::debug!("Connection '{}' registered to EventPusher", conn_id);
    }

    async fn unregister_connection(&self, conn_id: ConnectionId) {
        let mut connections = self.connections.lock().await;
        connections.remove(&conn_id);
        tracing::debug!("Connection '{}' unregistered from EventPusher", conn_id);
    }

    async fn push_to(&self, conn_id: ConnectionId, payload: &str) -> Result<(), EventPushError> {
        let connections = self.connections.lock().await;

        if let Some(sender) = connections.get(&conn_id) {
            sender
                .send(payload.to_string())
                .map_err(|e| EventPushError::PushFailed(e.to_string()))?;
            tracing::debug!("Pushed event to connection '{}'", conn_id);
            Ok(())
        } else {
            Err(EventPushError::ConnectionNotFound(conn_id))
        }
    }

    async fn broadcast(&self, targets: Vec<ConnectionId>, payload: &str) {
        let connections = self.connections.lock().await;

        for target in targets {
            if let Some(sender) = connections.get(&target) {
                // ブロードキャストでは一部の送信失敗を許容
                if let Err(e) = sender.send(payload.to_string()) {
                    tracing::warn!("Failed to push event to connection '{}': {}", target, e);
                } else {
                    tracing::debug!("Broadcasted event to connection '{}'", target);
                }
            } else {
                tracing::warn!("Connection '{}' not found during broadcast, skipping", target);
            }
        }
    }
}
