//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - メッセージ送信処理（メンバーシップ検証、永続ログへの追記、
//!   ブロードキャスト対象選定）
//!
//! ### なぜこのテストが必要か
//! - 非メンバーからの送信が拒否されることを保証
//! - 永続ログへの追記失敗がライブ配信を止めないこと（耐久性と
//!   ライブ性の分離）を確認
//! - エコー抑止：送信者自身がブロードキャスト対象に含まれない
//!
//! ### どのような状況を想定しているか
//! - 正常系：追記とブロードキャスト
//! - 異常系：追記失敗（ログ容量超過・ログ不達）、非メンバーの送信
//! - エッジケース：送信者のみが接続している場合（配信対象なし）

use std::sync::Arc;

use tokio::sync::Mutex;

use tamariba_shared::time::Clock;

use crate::domain::{
    ChatEvent, ConnectionId, EventId, EventPusher, GroupId, MembershipRegistry, MessageLog,
    MessageText, Timestamp, UserId,
};

use super::error::SendMessageError;

/// メッセージ送信の結果
#[derive(Debug)]
pub struct SendOutcome {
    /// 生成されたチャットイベント
    pub event: ChatEvent,
    /// イベント ID（追記成功ならログが採番、失敗ならローカル採番）
    pub event_id: EventId,
    /// 永続ログへの追記が成功したか
    pub appended: bool,
    /// ライブ配信の対象（送信者を除くメンバーのスナップショット）
    pub recipients: Vec<ConnectionId>,
}

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// メンバーシップレジストリ（共有インメモリ状態）
    registry: Arc<Mutex<MembershipRegistry>>,
    /// MessageLog（永続ログの抽象化）
    log: Arc<dyn MessageLog>,
    /// EventPusher（イベント配信の抽象化）
    pusher: Arc<dyn EventPusher>,
    /// Clock（時刻の抽象化）
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(
        registry: Arc<Mutex<MembershipRegistry>>,
        log: Arc<dyn MessageLog>,
        pusher: Arc<dyn EventPusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            log,
            pusher,
            clock,
        }
    }

    /// メッセージ送信を実行
    ///
    /// 1. メンバーシップを検証し、グループ内の表示名を解決
    /// 2. 永続ログへ追記（唯一の外部依存へのサスペンションポイント）
    /// 3. 配信対象をスナップショット
    ///
    /// 追記とライブ配信は非トランザクショナル：追記が失敗しても
    /// `recipients` は返され、呼び出し側はブロードキャストを続行した上で
    /// 送信者にのみ失敗を通知する。
    pub async fn execute(
        &self,
        conn_id: ConnectionId,
        sender_id: UserId,
        group_id: GroupId,
        text: MessageText,
    ) -> Result<SendOutcome, SendMessageError> {
        // 1. メンバーシップ検証
        let sender_name = {
            let registry = self.registry.lock().await;
            registry
                .label_of(&group_id, conn_id)
                .ok_or_else(|| SendMessageError::NotMember(group_id.as_str().to_string()))?
        };

        let event = ChatEvent::new(
            group_id.clone(),
            sender_id,
            sender_name,
            text,
            Timestamp::new(self.clock.now_millis()),
        );

        // 2. 永続ログへ追記（失敗してもライブ配信は続行する）
        let (event_id, appended) = match self.log.append(event.clone()).await {
            Ok(id) => (id, true),
            Err(e) => {
                tracing::warn!(
                    "Failed to append message to durable log for group '{}': {}",
                    group_id.as_str(),
                    e
                );
                (EventId::generate(), false)
            }
        };

        // 3. 配信対象をブロードキャスト時点でスナップショット（送信者を除く）
        let recipients = {
            let registry = self.registry.lock().await;
            registry.member_ids_excluding(&group_id, conn_id)
        };

        Ok(SendOutcome {
            event,
            event_id,
            appended,
            recipients,
        })
    }

    /// メッセージを配信対象にブロードキャスト
    pub async fn broadcast(&self, targets: Vec<ConnectionId>, message: &str) {
        self.pusher.broadcast(targets, message).await;
    }
}
