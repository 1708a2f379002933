//! エンティティ
//!
//! `ChatEvent` は検証済みの送信コマンドから一度だけ生成される不変レコード。
//! 設計上、同じイベントのコピーが 2 つ存在する：永続ログに追記される
//! コピーと、ライブ配信されるコピー。両者はタイムスタンプとイベント ID
//! で突き合わせて収束する。

use super::value_object::{DisplayName, EventId, GroupId, MessageText, Timestamp, UserId};

/// 1 件のチャットイベント（不変）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEvent {
    pub group_id: GroupId,
    pub sender_id: UserId,
    pub sender_name: DisplayName,
    pub text: MessageText,
    pub timestamp: Timestamp,
}

impl ChatEvent {
    pub fn new(
        group_id: GroupId,
        sender_id: UserId,
        sender_name: DisplayName,
        text: MessageText,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            group_id,
            sender_id,
            sender_name,
            text,
            timestamp,
        }
    }
}

/// 永続ログに追記済みのイベント（ログが採番した ID 付き）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEvent {
    pub id: EventId,
    pub event: ChatEvent,
}
