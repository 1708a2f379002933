//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::GroupId,
    infrastructure::dto::http::{
        GroupDetailDto, GroupListResponse, GroupSummaryDto, HealthResponse, MessageListResponse,
        MessageRecordDto,
    },
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Get the list of known groups
pub async fn list_groups(State(state): State<Arc<AppState>>) -> Json<GroupListResponse> {
    let groups = state.group_query_usecase.list_groups().await;

    // Domain Model から DTO への変換
    let groups: Vec<GroupSummaryDto> = groups.into_iter().map(Into::into).collect();

    Json(GroupListResponse { groups })
}

/// Get group detail by ID
pub async fn group_detail(
    State(state): State<Arc<AppState>>,
    Path(group_id): Path<String>,
) -> Result<Json<GroupDetailDto>, StatusCode> {
    let group_id = GroupId::try_from(group_id).map_err(|_| StatusCode::BAD_REQUEST)?;

    match state.group_query_usecase.group_detail(&group_id).await {
        Some(detail) => Ok(Json(detail.into())),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// Get the durable message log of a group
pub async fn group_messages(
    State(state): State<Arc<AppState>>,
    Path(group_id): Path<String>,
) -> Result<Json<MessageListResponse>, StatusCode> {
    let group_id = GroupId::try_from(group_id).map_err(|_| StatusCode::BAD_REQUEST)?;

    // Unknown groups 404 for consistency with the detail endpoint
    if state
        .group_query_usecase
        .group_detail(&group_id)
        .await
        .is_none()
    {
        return Err(StatusCode::NOT_FOUND);
    }

    let messages: Vec<MessageRecordDto> = state
        .group_query_usecase
        .messages(&group_id)
        .await
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(MessageListResponse { messages }))
}
