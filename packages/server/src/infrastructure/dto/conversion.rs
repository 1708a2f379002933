//! Conversion logic between domain entities and DTOs.

use crate::domain::{ChatEvent, EventId, StoredEvent};
use crate::infrastructure::dto::http as http_dto;
use crate::infrastructure::dto::websocket as ws_dto;
use crate::usecase::{GroupDetail, GroupSummary};

// ========================================
// Domain Entity → WebSocket DTO
// ========================================

/// Build a `message` event from a stored or freshly generated event id
/// and the chat event itself.
pub fn message_event(id: &EventId, event: &ChatEvent) -> ws_dto::ServerEvent {
    ws_dto::ServerEvent::Message {
        id: id.to_string(),
        group_id: event.group_id.as_str().to_string(),
        sender_id: event.sender_id.as_str().to_string(),
        sender_display_name: event.sender_name.as_str().to_string(),
        text: event.text.as_str().to_string(),
        timestamp: event.timestamp.value(),
    }
}

// ========================================
// Domain Entity → HTTP DTO
// ========================================

impl From<StoredEvent> for http_dto::MessageRecordDto {
    fn from(stored: StoredEvent) -> Self {
        Self {
            id: stored.id.to_string(),
            group_id: stored.event.group_id.into_string(),
            sender_id: stored.event.sender_id.into_string(),
            sender_display_name: stored.event.sender_name.into_string(),
            text: stored.event.text.into_string(),
            timestamp: stored.event.timestamp.value(),
        }
    }
}

impl From<GroupSummary> for http_dto::GroupSummaryDto {
    fn from(summary: GroupSummary) -> Self {
        Self {
            group_id: summary.group_id.into_string(),
            member_count: summary.member_count,
        }
    }
}

impl From<GroupDetail> for http_dto::GroupDetailDto {
    fn from(detail: GroupDetail) -> Self {
        Self {
            group_id: detail.group_id.into_string(),
            members: detail
                .members
                .into_iter()
                .map(|name| name.into_string())
                .collect(),
            typing: detail
                .typing
                .into_iter()
                .map(|name| name.into_string())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DisplayName, GroupId, MessageText, Timestamp, UserId};

    fn sample_event() -> ChatEvent {
        ChatEvent::new(
            GroupId::new("G1".to_string()).unwrap(),
            UserId::new("u-alice".to_string()).unwrap(),
            DisplayName::new("Alice".to_string()).unwrap(),
            MessageText::new("hello".to_string()).unwrap(),
            Timestamp::new(1000),
        )
    }

    #[test]
    fn test_message_event_carries_all_fields() {
        // テスト項目: ドメインの ChatEvent が message イベントに変換される
        // given (前提条件):
        let id = EventId::generate();
        let event = sample_event();

        // when (操作):
        let server_event = message_event(&id, &event);

        // then (期待する結果):
        match server_event {
            ws_dto::ServerEvent::Message {
                id: dto_id,
                group_id,
                sender_id,
                sender_display_name,
                text,
                timestamp,
            } => {
                assert_eq!(dto_id, id.to_string());
                assert_eq!(group_id, "G1");
                assert_eq!(sender_id, "u-alice");
                assert_eq!(sender_display_name, "Alice");
                assert_eq!(text, "hello");
                assert_eq!(timestamp, 1000);
            }
            other => panic!("expected Message, got {other:?}"),
        }
    }

    #[test]
    fn test_stored_event_to_message_record() {
        // テスト項目: StoredEvent が HTTP の MessageRecordDto に変換される
        // given (前提条件):
        let stored = StoredEvent {
            id: EventId::generate(),
            event: sample_event(),
        };
        let expected_id = stored.id.to_string();

        // when (操作):
        let dto: http_dto::MessageRecordDto = stored.into();

        // then (期待する結果):
        assert_eq!(dto.id, expected_id);
        assert_eq!(dto.group_id, "G1");
        assert_eq!(dto.sender_display_name, "Alice");
        assert_eq!(dto.text, "hello");
        assert_eq!(dto.timestamp, 1000);
    }

    #[test]
    fn test_group_detail_to_dto() {
        // テスト項目: GroupDetail が HTTP の GroupDetailDto に変換される
        // given (前提条件):
        let detail = GroupDetail {
            group_id: GroupId::new("G1".to_string()).unwrap(),
            members: vec![
                DisplayName::new("Alice".to_string()).unwrap(),
                DisplayName::new("Bob".to_string()).unwrap(),
            ],
            typing: vec![DisplayName::new("Bob".to_string()).unwrap()],
        };

        // when (操作):
        let dto: http_dto::GroupDetailDto = detail.into();

        // then (期待する結果):
        assert_eq!(dto.group_id, "G1");
        assert_eq!(dto.members, vec!["Alice", "Bob"]);
        assert_eq!(dto.typing, vec!["Bob"]);
    }
}
