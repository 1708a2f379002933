//! インメモリの MessageLog 実装
//!
//! ## 責務
//!
//! - グループごとのチャットイベント列の保持
//! - 追記（append）と読み出し（subscribe）
//!
//! ## 設計ノート
//!
//! グループごとに容量上限を持ちます。上限に達した追記は
//! `AppendError::CapacityExceeded` で失敗しますが、呼び出し側の
//! ライブ配信はこの失敗に影響されません。
//! 読み出しはタイムスタンプ順（同時刻はイベント ID 順）で返します。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{AppendError, ChatEvent, EventId, GroupId, MessageLog, StoredEvent};

/// グループごとのデフォルト容量
const DEFAULT_CAPACITY_PER_GROUP: usize = 1000;

/// インメモリの MessageLog 実装
pub struct InMemoryMessageLog {
    /// グループごとのイベント列
    ///
    /// Key: GroupId
    /// Value: 追記順の StoredEvent
    groups: Mutex<HashMap<GroupId, Vec<StoredEvent>>>,
    /// グループごとの容量上限
    capacity_per_group: usize,
}

impl InMemoryMessageLog {
    /// デフォルト容量で新しい InMemoryMessageLog を作成
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY_PER_GROUP)
    }

    /// 容量上限を指定して作成
    pub fn with_capacity(capacity_per_group: usize) -> Self {
        Self {
            groups: Mutex::new(HashMap::new()),
            capacity_per_group,
        }
    }
}

impl Default for InMemoryMessageLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageLog for InMemoryMessageLog {
    async fn append(&self, event: ChatEvent) -> Result<EventId, AppendError> {
        let mut groups = self.groups.lock().await;
        let entries = groups.entry(event.group_id.clone()).or_default();

        if entries.len() >= self.capacity_per_group {
            return Err(AppendError::CapacityExceeded(
                event.group_id.as_str().to_string(),
            ));
        }

        let id = EventId::generate();
        entries.push(StoredEvent {
            id: id.clone(),
            event,
        });
        Ok(id)
    }

    async fn subscribe(&self, group_id: &GroupId) -> Vec<StoredEvent> {
        let groups = self.groups.lock().await;
        let mut entries = groups.get(group_id).cloned().unwrap_or_default();
        entries.sort_by(|a, b| {
            a.event
                .timestamp
                .cmp(&b.event.timestamp)
                .then_with(|| a.id.cmp(&b.id))
        });
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DisplayName, MessageText, Timestamp, UserId};

    fn group(id: &str) -> GroupId {
        GroupId::new(id.to_string()).unwrap()
    }

    fn event(group_id: &str, text: &str, millis: i64) -> ChatEvent {
        ChatEvent::new(
            group(group_id),
            UserId::new("u-alice".to_string()).unwrap(),
            DisplayName::new("Alice".to_string()).unwrap(),
            MessageText::new(text.to_string()).unwrap(),
            Timestamp::new(millis),
        )
    }

    #[tokio::test]
    async fn test_append_and_subscribe() {
        // テスト項目: 追記したイベントが subscribe で取得できる
        // given (前提条件):
        let log = InMemoryMessageLog::new();

        // when (操作):
        let id = log.append(event("G1", "hello", 1000)).await.unwrap();
        let stored = log.subscribe(&group("G1")).await;

        // then (期待する結果):
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, id);
        assert_eq!(stored[0].event.text.as_str(), "hello");
    }

    #[tokio::test]
    async fn test_subscribe_orders_by_timestamp() {
        // テスト項目: 読み出しはタイムスタンプ順
        // given (前提条件): 逆順で追記
        let log = InMemoryMessageLog::new();
        log.append(event("G1", "second", 2000)).await.unwrap();
        log.append(event("G1", "first", 1000)).await.unwrap();

        // when (操作):
        let stored = log.subscribe(&group("G1")).await;

        // then (期待する結果):
        assert_eq!(stored[0].event.text.as_str(), "first");
        assert_eq!(stored[1].event.text.as_str(), "second");
    }

    #[tokio::test]
    async fn test_subscribe_unknown_group_is_empty() {
        // テスト項目: 未知のグループの読み出しは空
        // given (前提条件):
        let log = InMemoryMessageLog::new();

        // when (操作):
        let stored = log.subscribe(&group("nope")).await;

        // then (期待する結果):
        assert!(stored.is_empty());
    }

    #[tokio::test]
    async fn test_groups_are_isolated() {
        // テスト項目: グループ間でイベントが混ざらない
        // given (前提条件):
        let log = InMemoryMessageLog::new();
        log.append(event("G1", "for g1", 1000)).await.unwrap();
        log.append(event("G2", "for g2", 1000)).await.unwrap();

        // when (操作):
        let g1 = log.subscribe(&group("G1")).await;
        let g2 = log.subscribe(&group("G2")).await;

        // then (期待する結果):
        assert_eq!(g1.len(), 1);
        assert_eq!(g1[0].event.text.as_str(), "for g1");
        assert_eq!(g2.len(), 1);
        assert_eq!(g2[0].event.text.as_str(), "for g2");
    }

    #[tokio::test]
    async fn test_append_over_capacity_fails() {
        // テスト項目: 容量上限を超えた追記は CapacityExceeded で失敗する
        // given (前提条件): 容量 2 のログ
        let log = InMemoryMessageLog::with_capacity(2);
        log.append(event("G1", "one", 1000)).await.unwrap();
        log.append(event("G1", "two", 2000)).await.unwrap();

        // when (操作):
        let result = log.append(event("G1", "three", 3000)).await;

        // then (期待する結果): 失敗し、既存のイベントは保持される
        assert!(matches!(
            result.unwrap_err(),
            AppendError::CapacityExceeded(_)
        ));
        assert_eq!(log.subscribe(&group("G1")).await.len(), 2);
    }
}
