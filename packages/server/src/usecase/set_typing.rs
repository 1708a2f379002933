//! UseCase: タイピング状態の更新処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SetTypingUseCase::execute() メソッド
//! - タイピング状態の更新と、グループ全員への配信対象選定
//!
//! ### なぜこのテストが必要か
//! - 非メンバーからのタイピング更新が拒否されることを保証
//! - タイピングイベントにはエコー抑止がない（本人も配信対象）ことを固定
//! - 集合が変わらない更新（重複 true など）でも配信されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：開始・停止の更新とソート済みの名前一覧
//! - 異常系：非メンバーの更新
//! - エッジケース：冪等な更新（既に true のまま true）

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, DisplayName, EventPusher, GroupId, MembershipRegistry, TypingTracker,
};

use super::error::SetTypingError;

/// タイピング状態更新の結果
#[derive(Debug)]
pub struct TypingOutcome {
    /// 更新後のタイピング中の表示名（ソート済み）
    pub typing_names: Vec<DisplayName>,
    /// 配信対象（本人を含むグループ全メンバーのスナップショット）
    pub recipients: Vec<ConnectionId>,
}

/// タイピング状態更新のユースケース
pub struct SetTypingUseCase {
    /// メンバーシップレジストリ（共有インメモリ状態）
    registry: Arc<Mutex<MembershipRegistry>>,
    /// タイピング状態トラッカー（共有インメモリ状態）
    typing: Arc<Mutex<TypingTracker>>,
    /// EventPusher（イベント配信の抽象化）
    pusher: Arc<dyn EventPusher>,
}

impl SetTypingUseCase {
    /// 新しい SetTypingUseCase を作成
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

    /// タイピング状態更新を実行
    ///
    /// メッセージ送信と異なり、配信対象は本人を含むグループ全員。
    /// 集合が変わらない更新でも配信は行う。
    /// ロック順はレジストリ、トラッカーの順で固定。
    pub async fn execute(
        &self,
        conn_id: ConnectionId,
        group_id: GroupId,
        is_typing: bool,
    ) -> Result<TypingOutcome, SetTypingError> {
        let (label, recipients) = {
            let registry = self.registry.lock().await;
            let label = registry
                .label_of(&group_id, conn_id)
                .ok_or_else(|| SetTypingError::NotMember(group_id.as_str().to_string()))?;
            (label, registry.member_ids(&group_id))
        };

        let typing_names = {
            let mut typing = self.typing.lock().await;
            typing.set_typing(&group_id, &label, is_typing)
        };

        Ok(TypingOutcome {
            typing_names,
            recipients,
        })
    }

    /// タイピング状態をグループ全員にブロードキャスト
    pub async fn broadcast(&self, targets: Vec<ConnectionId>, message: &str) {
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

    async fn create_test_usecase(
        members: &[(ConnectionId, &str)],
    ) -> SetTypingUseCase {
        let registry = Arc::new(Mutex::new(MembershipRegistry::new()));
        {
            let mut lock = registry.lock().await;
            for (conn_id, label) in members {
                lock.add(group("G1"), *conn_id, name(label));
            }
        }
        SetTypingUseCase::new(
            registry,
            Arc::new(Mutex::new(TypingTracker::new())),
            Arc::new(WebSocketEventPusher::new()),
        )
    }

    #[tokio::test]
    async fn test_typing_start_includes_sender_in_recipients() {
        // テスト項目: タイピング開始はグループ全員（本人含む）に配信される
        // given: G1 に 2 接続
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        let usecase = create_test_usecase(&[(alice, "Alice"), (bob, "Bob")]).await;

        // when: alice がタイピング開始
        let outcome = usecase.execute(alice, group("G1"), true).await.unwrap();

        // then: 本人もエコー対象に含まれる（エコー抑止なし）
        assert_eq!(outcome.typing_names, vec![name("Alice")]);
        assert_eq!(outcome.recipients.len(), 2);
        assert!(outcome.recipients.contains(&alice));
        assert!(outcome.recipients.contains(&bob));
    }

    #[tokio::test]
    async fn test_typing_stop_removes_name() {
        // テスト項目: タイピング停止で名前が集合から外れる
        // given: alice と bob がタイピング中
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        let usecase = create_test_usecase(&[(alice, "Alice"), (bob, "Bob")]).await;
        usecase.execute(alice, group("G1"), true).await.unwrap();
        usecase.execute(bob, group("G1"), true).await.unwrap();

        // when: alice が停止
        let outcome = usecase.execute(alice, group("G1"), false).await.unwrap();

        // then:
        assert_eq!(outcome.typing_names, vec![name("Bob")]);
    }

    #[tokio::test]
    async fn test_typing_names_are_sorted() {
        // テスト項目: タイピング中の表示名はソート済みで返る
        // given:
        let zoe = ConnectionId::generate();
        let amy = ConnectionId::generate();
        let usecase = create_test_usecase(&[(zoe, "Zoe"), (amy, "Amy")]).await;
        usecase.execute(zoe, group("G1"), true).await.unwrap();

        // when:
        let outcome = usecase.execute(amy, group("G1"), true).await.unwrap();

        // then:
        assert_eq!(outcome.typing_names, vec![name("Amy"), name("Zoe")]);
    }

    #[tokio::test]
    async fn test_typing_not_member() {
        // テスト項目: 非メンバーのタイピング更新は NotMember で拒否される
        // given:
        let alice = ConnectionId::generate();
        let usecase = create_test_usecase(&[(alice, "Alice")]).await;

        // when:
        let outsider = ConnectionId::generate();
        let result = usecase.execute(outsider, group("G1"), true).await;

        // then:
        assert_eq!(
            result.unwrap_err(),
            SetTypingError::NotMember("G1".to_string())
        );
    }

    #[tokio::test]
    async fn test_redundant_typing_update_still_broadcasts() {
        // テスト項目: 集合が変わらない更新でも配信対象は返る
        // given: alice が既にタイピング中
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        let usecase = create_test_usecase(&[(alice, "Alice"), (bob, "Bob")]).await;
        usecase.execute(alice, group("G1"), true).await.unwrap();

        // when: 同じ true を再送
        let outcome = usecase.execute(alice, group("G1"), true).await.unwrap();

        // then:
        assert_eq!(outcome.typing_names, vec![name("Alice")]);
        assert_eq!(outcome.recipients.len(), 2);
    }
}
