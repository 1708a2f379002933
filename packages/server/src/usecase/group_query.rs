//! UseCase: グループ情報の参照処理
//!
//! HTTP の読み取り系エンドポイントから利用される。状態を変更しない。

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{
    DisplayName, GroupId, MembershipRegistry, MessageLog, StoredEvent, TypingTracker,
};

/// グループの概要
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSummary {
    /// グループ ID
    pub group_id: GroupId,
    /// 現在のメンバー数
    pub member_count: usize,
}

/// グループの詳細
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupDetail {
    /// グループ ID
    pub group_id: GroupId,
    /// メンバーの表示名（ソート済み）
    pub members: Vec<DisplayName>,
    /// タイピング中の表示名（ソート済み）
    pub typing: Vec<DisplayName>,
}

/// グループ参照のユースケース
pub struct GroupQueryUseCase {
    /// メンバーシップレジストリ（共有インメモリ状態）
    registry: Arc<Mutex<MembershipRegistry>>,
    /// タイピング状態トラッカー（共有インメモリ状態）
    typing: Arc<Mutex<TypingTracker>>,
    /// MessageLog（永続ログの抽象化）
    log: Arc<dyn MessageLog>,
}

impl GroupQueryUseCase {
    /// 新しい GroupQueryUseCase を作成
    pub fn new(
        registry: Arc<Mutex<MembershipRegistry>>,
        typing: Arc<Mutex<TypingTracker>>,
        log: Arc<dyn MessageLog>,
    ) -> Self {
        Self {
            registry,
            typing,
            log,
        }
    }

    /// 既知のグループ一覧を取得（グループ ID でソート済み）
    pub async fn list_groups(&self) -> Vec<GroupSummary> {
        let registry = self.registry.lock().await;
        registry
            .group_ids()
            .into_iter()
            .map(|group_id| {
                let member_count = registry.member_count(&group_id);
                GroupSummary {
                    group_id,
                    member_count,
                }
            })
            .collect()
    }

    /// グループ詳細を取得。未知のグループなら None
    pub async fn group_detail(&self, group_id: &GroupId) -> Option<GroupDetail> {
        let members = {
            let registry = self.registry.lock().await;
            if !registry.knows_group(group_id) {
                return None;
            }
            let mut labels: Vec<DisplayName> = registry
                .members_of(group_id)
                .into_iter()
                .map(|(_, label)| label)
                .collect();
            labels.sort();
            labels
        };
        let typing = self.typing.lock().await.typing_in(group_id);
        Some(GroupDetail {
            group_id: group_id.clone(),
            members,
            typing,
        })
    }

    /// グループの永続ログを取得（タイムスタンプ順）
    pub async fn messages(&self, group_id: &GroupId) -> Vec<StoredEvent> {
        self.log.subscribe(group_id).await
    }
}
