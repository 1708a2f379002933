//! UseCase: 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectUseCase::execute() メソッド
//! - 切断時のクリーンアップ（メンバーシップ除去、タイピング状態除去、
//!   配信チャネルの登録解除）
//!
//! ### なぜこのテストが必要か
//! - 切断後にレジストリとトラッカーに残留エントリがないことを保証
//! - タイピング中に切断した場合、残メンバーへ更新後のタイピング集合が
//!   配信されることを確認
//! - 退出通知（member_left 相当）は配信しない仕様を固定
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数グループに参加した接続の切断
//! - エッジケース：タイピング中でない接続の切断（タイピング更新なし）、
//!   未参加の接続の切断（no-op）

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, DisplayName, EventPusher, GroupId, MembershipRegistry, TypingTracker,
};

/// 切断によって生じたグループごとのタイピング状態更新
#[derive(Debug)]
pub struct GroupTypingUpdate {
    /// 対象グループ
    pub group_id: GroupId,
    /// 更新後のタイピング中の表示名（ソート済み）
    pub typing_names: Vec<DisplayName>,
    /// 配信対象（切断後に残ったメンバーのスナップショット)
    pub recipients: Vec<ConnectionId>,
}

/// 切断処理のユースケース
pub struct DisconnectUseCase {
    /// メンバーシップレジストリ（共有インメモリ状態）
    registry: Arc<Mutex<MembershipRegistry>>,
    /// タイピング状態トラッカー（共有インメモリ状態）
    typing: Arc<Mutex<TypingTracker>>,
    /// EventPusher（イベント配信の抽象化）
    pusher: Arc<dyn EventPusher>,
}

impl DisconnectUseCase {
    /// 新しい DisconnectUseCase を作成
    pub fn new(
        registry: Arc<Mutex<MembershipRegistry>>,
        typing: Arc<Mutex<TypingTracker>>,
        pusher: Arc<dyn EventPusher>,
    ) -> Self {
        Self {
            registry,
            typing,
            pusher,
        }
    }

    /// 切断クリーンアップを実行
    ///
    /// 参加していた全グループからメンバーシップを除去し、タイピング中
    /// だったグループについてのみ更新後のタイピング集合を返す。退出通知は
    /// 配信しない（参加通知と非対称だが観測された挙動を維持）。
    pub async fn execute(&self, conn_id: ConnectionId) -> Vec<GroupTypingUpdate> {
        // 1. メンバーシップ除去と残メンバーのスナップショット
        //    ロック順はレジストリ、トラッカーの順で固定
        let removed: Vec<(GroupId, DisplayName, Vec<ConnectionId>)> = {
            let mut registry = self.registry.lock().await;
            registry
                .remove(conn_id)
                .into_iter()
                .map(|(group_id, label)| {
                    let remaining = registry.member_ids(&group_id);
                    (group_id, label, remaining)
                })
                .collect()
        };

        // 2. タイピング状態の除去。実際にタイピング中だったグループだけ更新を返す
        let mut updates = Vec::new();
        {
            let mut typing = self.typing.lock().await;
            for (group_id, label, recipients) in removed {
                if typing.clear(&group_id, &label) {
                    updates.push(GroupTypingUpdate {
                        typing_names: typing.typing_in(&group_id),
                        group_id,
                        recipients,
                    });
                }
            }
        }

        // 3. 配信チャネルの登録解除
        self.pusher.unregister_connection(conn_id).await;

        updates
    }

    /// タイピング状態の更新を残メンバーにブロードキャスト
    pub async fn broadcast_typing_update(&self, targets: Vec<ConnectionId>, message: &str) {
        self.pusher.broadcast(targets, message).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::event_pusher::WebSocketEventPusher;

    fn group(id: &str) -> GroupId {
        GroupId::new(id.to_string()).unwrap()
    }

    fn name(n: &str) -> DisplayName {
        DisplayName::new(n.to_string()).unwrap()
    }

    fn create_test_usecase() -> (
        DisconnectUseCase,
        Arc<Mutex<MembershipRegistry>>,
        Arc<Mutex<TypingTracker>>,
    ) {
        let registry = Arc::new(Mutex::new(MembershipRegistry::new()));
        let typing = Arc::new(Mutex::new(TypingTracker::new()));
        let usecase = DisconnectUseCase::new(
            registry.clone(),
            typing.clone(),
            Arc::new(WebSocketEventPusher::new()),
        );
        (usecase, registry, typing)
    }

    #[tokio::test]
    async fn test_disconnect_purges_membership() {
        // テスト項目: 切断で全グループからメンバーシップが除去される
        // given: alice が G1, G2 に参加
        let (usecase, registry, _typing) = create_test_usecase();
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        {
            let mut lock = registry.lock().await;
            lock.add(group("G1"), alice, name("Alice"));
            lock.add(group("G2"), alice, name("Alice"));
            lock.add(group("G1"), bob, name("Bob"));
        }

        // when:
        usecase.execute(alice).await;

        // then: alice はどちらのグループのメンバーでもない
        let lock = registry.lock().await;
        assert!(!lock.is_member(&group("G1"), alice));
        assert!(!lock.is_member(&group("G2"), alice));
        assert!(lock.is_member(&group("G1"), bob));
    }

    #[tokio::test]
    async fn test_disconnect_while_typing_yields_update() {
        // テスト項目: タイピング中の切断は残メンバー向けの更新を返す
        // given: alice が G1 でタイピング中
        let (usecase, registry, typing) = create_test_usecase();
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        {
            let mut lock = registry.lock().await;
            lock.add(group("G1"), alice, name("Alice"));
            lock.add(group("G1"), bob, name("Bob"));
        }
        typing
            .lock()
            .await
            .set_typing(&group("G1"), &name("Alice"), true);

        // when:
        let updates = usecase.execute(alice).await;

        // then: G1 の更新が 1 件、配信対象は bob のみ、集合は空
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].group_id, group("G1"));
        assert!(updates[0].typing_names.is_empty());
        assert_eq!(updates[0].recipients, vec![bob]);
    }

    #[tokio::test]
    async fn test_disconnect_without_typing_yields_no_update() {
        // テスト項目: タイピング中でなければタイピング更新は生じない
        // given: alice は参加しているがタイピングしていない
        let (usecase, registry, _typing) = create_test_usecase();
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        {
            let mut lock = registry.lock().await;
            lock.add(group("G1"), alice, name("Alice"));
            lock.add(group("G1"), bob, name("Bob"));
        }

        // when:
        let updates = usecase.execute(alice).await;

        // then: 退出通知もタイピング更新も発生しない
        assert!(updates.is_empty());
    }

    #[tokio::test]
    async fn test_disconnect_unknown_connection_is_noop() {
        // テスト項目: 未参加の接続の切断は no-op
        // given:
        let (usecase, _registry, _typing) = create_test_usecase();

        // when:
        let updates = usecase.execute(ConnectionId::generate()).await;

        // then:
        assert!(updates.is_empty());
    }

    #[tokio::test]
    async fn test_disconnect_clears_typing_in_multiple_groups() {
        // テスト項目: 複数グループでタイピング中でも全て除去される
        // given: alice が G1, G2 両方でタイピング中
        let (usecase, registry, typing) = create_test_usecase();
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        {
            let mut lock = registry.lock().await;
            lock.add(group("G1"), alice, name("Alice"));
            lock.add(group("G2"), alice, name("Alice"));
            lock.add(group("G2"), bob, name("Bob"));
        }
        {
            let mut lock = typing.lock().await;
            lock.set_typing(&group("G1"), &name("Alice"), true);
            lock.set_typing(&group("G2"), &name("Alice"), true);
            lock.set_typing(&group("G2"), &name("Bob"), true);
        }

        // when:
        let mut updates = usecase.execute(alice).await;

        // then: G1 は空、G2 は bob のみ残る
        updates.sort_by(|a, b| a.group_id.cmp(&b.group_id));
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].group_id, group("G1"));
        assert!(updates[0].typing_names.is_empty());
        assert!(updates[0].recipients.is_empty());
        assert_eq!(updates[1].group_id, group("G2"));
        assert_eq!(updates[1].typing_names, vec![name("Bob")]);
        assert_eq!(updates[1].recipients, vec![bob]);
    }
}
