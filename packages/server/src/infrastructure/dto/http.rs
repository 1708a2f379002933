//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Response for `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// One entry of `GET /api/groups`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupSummaryDto {
    pub group_id: String,
    pub member_count: usize,
}

/// Response for `GET /api/groups`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupListResponse {
    pub groups: Vec<GroupSummaryDto>,
}

/// Response for `GET /api/groups/{group_id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupDetailDto {
    pub group_id: String,
    pub members: Vec<String>,
    pub typing: Vec<String>,
}

/// One entry of `GET /api/groups/{group_id}/messages`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageRecordDto {
    pub id: String,
    pub group_id: String,
    pub sender_id: String,
    pub sender_display_name: String,
    pub text: String,
    pub timestamp: i64,
}

/// Response for `GET /api/groups/{group_id}/messages`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageListResponse {
    pub messages: Vec<MessageRecordDto>,
}
