//! EventPusher trait 定義
//!
//! ブロードキャストファンアウトの抽象化。UseCase 層はこの trait に依存し、
//! WebSocket 実装（Infrastructure 層）には依存しない。
//!
//! 配信は受信者ごとに fire-and-forget：個々の接続への送信失敗は黙って
//! 捨てられ、他メンバーへの配信にも送信者にも影響しない。受信者ごとの
//! FIFO 順序のみが保証される。

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::value_object::ConnectionId;

/// 接続ごとの送信チャンネル（UI 層が生成し、pusher が管理する）
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// 単一接続への直接送信の失敗
#[derive(Debug, Error)]
pub enum EventPushError {
    #[error("connection '{0}' not found")]
    ConnectionNotFound(ConnectionId),
    #[error("failed to push event: {0}")]
    PushFailed(String),
}

/// イベント配信の抽象化
#[async_trait]
pub trait EventPusher: Send + Sync {
    /// 接続の送信チャンネルを登録する
    async fn register_connection(&self, conn_id: ConnectionId, sender: PusherChannel);

    /// 接続の送信チャンネルを登録解除する
    async fn unregister_connection(&self, conn_id: ConnectionId);

    /// 特定の接続へ直接送信する（エラー通知など）
    async fn push_to(&self, conn_id: ConnectionId, payload: &str) -> Result<(), EventPushError>;

    /// 対象の接続群へブロードキャストする
    ///
    /// 個々の受信者への送信失敗は無視される（fire-and-forget）。
    async fn broadcast(&self, targets: Vec<ConnectionId>, payload: &str);
}
