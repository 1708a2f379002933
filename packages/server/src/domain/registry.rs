//! メンバーシップレジストリ
//!
//! グループ → (接続, 表示名) と 接続 → グループ集合 の双方向インデックス。
//! 純粋なインメモリ構造で永続化はしない。グループは最初の join で遅延生成
//! され、空になっても明示的には破棄しない。
//!
//! 呼び出し側（UseCase 層）が `tokio::sync::Mutex` 越しに直列化して
//! アクセスする前提のため、この型自体は同期プリミティブを持たない。

use std::collections::{HashMap, HashSet};

use super::value_object::{ConnectionId, DisplayName, GroupId};

/// グループメンバーシップの双方向インデックス
#[derive(Debug, Default)]
pub struct MembershipRegistry {
    /// group → {connection → display label}
    groups: HashMap<GroupId, HashMap<ConnectionId, DisplayName>>,
    /// connection → joined groups
    connections: HashMap<ConnectionId, HashSet<GroupId>>,
}

impl MembershipRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// メンバーシップエントリを追加する（冪等）
    ///
    /// 既にエントリが存在する場合は何もせず `false` を返す。
    /// 再 join で表示名が変わっても既存のラベルは維持する。
    pub fn add(&mut self, group_id: GroupId, conn_id: ConnectionId, label: DisplayName) -> bool {
        let members = self.groups.entry(group_id.clone()).or_default();
        if members.contains_key(&conn_id) {
            return false;
        }
        members.insert(conn_id, label);
        self.connections.entry(conn_id).or_default().insert(group_id);
        true
    }

    /// 接続を全てのグループから削除する
    ///
    /// 削除された (グループ, 表示名) の組を返す。呼び出し側はこれを使って
    /// グループごとのタイピング状態を掃除する。
    pub fn remove(&mut self, conn_id: ConnectionId) -> Vec<(GroupId, DisplayName)> {
        let Some(joined) = self.connections.remove(&conn_id) else {
            return Vec::new();
        };

        let mut affected = Vec::with_capacity(joined.len());
        for group_id in joined {
            if let Some(members) = self.groups.get_mut(&group_id) {
                if let Some(label) = members.remove(&conn_id) {
                    affected.push((group_id, label));
                }
            }
        }
        affected
    }

    /// 接続がグループのメンバーかどうか
    pub fn is_member(&self, group_id: &GroupId, conn_id: ConnectionId) -> bool {
        self.groups
            .get(group_id)
            .is_some_and(|members| members.contains_key(&conn_id))
    }

    /// グループ内での接続の表示名
    pub fn label_of(&self, group_id: &GroupId, conn_id: ConnectionId) -> Option<DisplayName> {
        self.groups
            .get(group_id)
            .and_then(|members| members.get(&conn_id))
            .cloned()
    }

    /// グループの全メンバー（接続 ID と表示名のスナップショット）
    pub fn members_of(&self, group_id: &GroupId) -> Vec<(ConnectionId, DisplayName)> {
        self.groups
            .get(group_id)
            .map(|members| {
                members
                    .iter()
                    .map(|(conn_id, label)| (*conn_id, label.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// グループの全メンバーの接続 ID
    pub fn member_ids(&self, group_id: &GroupId) -> Vec<ConnectionId> {
        self.groups
            .get(group_id)
            .map(|members| members.keys().copied().collect())
            .unwrap_or_default()
    }

    /// 指定した接続を除くグループメンバーの接続 ID（エコー抑止用）
    pub fn member_ids_excluding(
        &self,
        group_id: &GroupId,
        exclude: ConnectionId,
    ) -> Vec<ConnectionId> {
        self.groups
            .get(group_id)
            .map(|members| {
                members
                    .keys()
                    .copied()
                    .filter(|conn_id| *conn_id != exclude)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// グループのメンバー数
    pub fn member_count(&self, group_id: &GroupId) -> usize {
        self.groups
            .get(group_id)
            .map(|members| members.len())
            .unwrap_or(0)
    }

    /// 既知の全グループ ID（ソート済み）
    pub fn group_ids(&self) -> Vec<GroupId> {
        let mut ids: Vec<GroupId> = self.groups.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// グループが既知かどうか（一度でも join されたか）
    pub fn knows_group(&self, group_id: &GroupId) -> bool {
        self.groups.contains_key(group_id)
    }
}
