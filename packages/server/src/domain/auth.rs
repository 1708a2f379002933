//! TokenVerifier trait 定義
//!
//! 認証コラボレータへのインターフェース。クレデンシャルトークンを
//! 検証し、認証済みユーザ ID に解決する。検証の失敗は接続のクローズに
//! つながる（リトライはしない）。

use async_trait::async_trait;
use thiserror::Error;

use super::value_object::UserId;

/// トークン検証の失敗
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid credential token")]
    InvalidToken,
    #[error("credential token expired")]
    TokenExpired,
}

/// クレデンシャルトークンの検証
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// トークンを検証し、認証済みユーザ ID を返す
    async fn verify(&self, token: &str) -> Result<UserId, AuthError>;
}
