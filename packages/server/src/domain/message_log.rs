//! MessageLog trait 定義
//!
//! 永続メッセージログ（外部コラボレータ）へのインターフェース。
//! コーディネータはイベントを追記するだけで、履歴のリプレイ配信は
//! 行わない。クライアント層はこのログのスナップショットを独立に読む。
//!
//! 追記とライブブロードキャストは意図的に非トランザクショナル：
//! 追記の失敗はライブ配信を止めず、送信者にのみ通知される。

use async_trait::async_trait;
use thiserror::Error;

use super::entity::{ChatEvent, StoredEvent};
use super::value_object::{EventId, GroupId};

/// 永続ログへの追記失敗
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AppendError {
    #[error("message log for group '{0}' is at capacity")]
    CapacityExceeded(String),
    #[error("message log unavailable: {0}")]
    Unavailable(String),
}

/// 追記専用・タイムスタンプ順の永続メッセージログ
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageLog: Send + Sync {
    /// イベントを追記し、ログが採番したイベント ID を返す
    async fn append(&self, event: ChatEvent) -> Result<EventId, AppendError>;

    /// グループのイベント列のスナップショットを返す
    ///
    /// タイムスタンプ昇順。呼び出しごとに先頭から読み直せる。
    async fn subscribe(&self, group_id: &GroupId) -> Vec<StoredEvent>;
}
