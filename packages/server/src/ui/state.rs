//! Server state shared across handlers.

use std::sync::Arc;

use crate::domain::{EventPusher, TokenVerifier};
use crate::usecase::{
    DisconnectUseCase, GroupQueryUseCase, JoinGroupUseCase, SendMessageUseCase, SetTypingUseCase,
};

/// Shared application state
pub struct AppState {
    /// JoinGroupUseCase（グループ参加のユースケース）
    pub join_group_usecase: Arc<JoinGroupUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// SetTypingUseCase（タイピング状態更新のユースケース）
    pub set_typing_usecase: Arc<SetTypingUseCase>,
    /// DisconnectUseCase（切断処理のユースケース）
    pub disconnect_usecase: Arc<DisconnectUseCase>,
    /// GroupQueryUseCase（グループ参照のユースケース）
    pub group_query_usecase: Arc<GroupQueryUseCase>,
    /// EventPusher（イベント配信の抽象化）
    pub pusher: Arc<dyn EventPusher>,
    /// TokenVerifier（認証の抽象化）
    pub verifier: Arc<dyn TokenVerifier>,
}
