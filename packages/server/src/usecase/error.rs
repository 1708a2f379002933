//! UseCase 層のエラー型

use thiserror::Error;

/// メッセージ送信の失敗
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendMessageError {
    /// 送信者がグループのメンバーではない
    #[error("connection is not a member of group '{0}'")]
    NotMember(String),
}

/// タイピング状態更新の失敗
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SetTypingError {
    /// 接続がグループのメンバーではない
    #[error("connection is not a member of group '{0}'")]
    NotMember(String),
}
