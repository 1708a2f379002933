//! タイピング状態トラッカー
//!
//! グループ → 「現在入力中」の表示名集合。明示的な stop 信号か接続の
//! 切断で消える短命な状態で、時間ベースの自動失効は持たない（切断が
//! 検出されるまで stale なエントリが残り得る。詳細は DESIGN.md）。

use std::collections::{BTreeSet, HashMap};

use super::value_object::{DisplayName, GroupId};

/// グループごとのタイピング中メンバー集合
///
/// `BTreeSet` を使い、ブロードキャストされるリストの順序を決定的にする。
#[derive(Debug, Default)]
pub struct TypingTracker {
    groups: HashMap<GroupId, BTreeSet<DisplayName>>,
}

impl TypingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// タイピング状態を更新し、更新後の集合を返す（ブロードキャスト用）
    pub fn set_typing(
        &mut self,
        group_id: &GroupId,
        label: &DisplayName,
        is_typing: bool,
    ) -> Vec<DisplayName> {
        let members = self.groups.entry(group_id.clone()).or_default();
        if is_typing {
            members.insert(label.clone());
        } else {
            members.remove(label);
        }
        members.iter().cloned().collect()
    }

    /// 表示名をグループの集合から取り除く（切断パス用）
    ///
    /// 直前の状態に関わらず取り除く。実際に存在した場合のみ `true` を返す。
    pub fn clear(&mut self, group_id: &GroupId, label: &DisplayName) -> bool {
        self.groups
            .get_mut(group_id)
            .is_some_and(|members| members.remove(label))
    }

    /// グループの現在のタイピング中メンバー
    pub fn typing_in(&self, group_id: &GroupId) -> Vec<DisplayName> {
        self.groups
            .get(group_id)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default()
    }
}
