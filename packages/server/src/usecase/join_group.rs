//! UseCase: グループ参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinGroupUseCase::execute() メソッド
//! - グループ参加処理（冪等な登録、参加通知の対象選定）
//!
//! ### なぜこのテストが必要か
//! - 再 join でメンバーシップエントリが重複しないことを保証
//! - 参加通知が本人を除く既存メンバーに限定されることを確認
//! - 再 join でも通知対象が再度返される（通知の再発火）仕様を固定
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規メンバーの参加と通知
//! - エッジケース：最初の参加者（通知対象なし）
//! - 既知の癖：再 join での通知再発火

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{ConnectionId, DisplayName, EventPusher, GroupId, MembershipRegistry};

/// グループ参加の結果
#[derive(Debug)]
pub struct JoinOutcome {
    /// 新規エントリだったか（再 join なら false）
    pub newly_joined: bool,
    /// 参加通知の対象（本人を除くグループメンバーのスナップショット）
    pub notice_targets: Vec<ConnectionId>,
}

/// グループ参加のユースケース
pub struct JoinGroupUseCase {
    /// メンバーシップレジストリ（共有インメモリ状態）
    registry: Arc<Mutex<MembershipRegistry>>,
    /// EventPusher（イベント配信の抽象化）
    pusher: Arc<dyn EventPusher>,
}

impl JoinGroupUseCase {
    /// 新しい JoinGroupUseCase を作成
    pub fn new(registry: Arc<Mutex<MembershipRegistry>>, pusher: Arc<dyn EventPusher>) -> Self {
        Self { registry, pusher }
    }

    /// グループ参加を実行
    ///
    /// 冪等：既にメンバーでも成功し、レジストリは変化しない。ただし
    /// 参加通知の対象は毎回返す（再 join でも通知が再発火する、観測された
    /// 挙動の維持）。
    pub async fn execute(
        &self,
        conn_id: ConnectionId,
        group_id: GroupId,
        display_name: DisplayName,
    ) -> JoinOutcome {
        let mut registry = self.registry.lock().await;
        let newly_joined = registry.add(group_id.clone(), conn_id, display_name);
        let notice_targets = registry.member_ids_excluding(&group_id, conn_id);
        JoinOutcome {
            newly_joined,
            notice_targets,
        }
    }

    /// 参加通知を既存メンバーにブロードキャスト
    ///
    /// # Arguments
    ///
    /// * `targets` - `execute` が返した通知対象
    /// * `message` - ブロードキャストするメッセージ（JSON）
    pub async fn broadcast_member_joined(&self, targets: Vec<ConnectionId>, message: &str) {
        self.pusher.broadcast(targets, message).await;
    }
}
