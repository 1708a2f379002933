//! ドメイン層
//!
//! グループメッセージングの中核となる型と振る舞いを定義します。
//! 外部コラボレータ（認証、永続ログ、配信）へのインターフェースは
//! trait として定義し、具体的な実装は Infrastructure 層が提供します
//! （依存性の逆転）。

pub mod auth;
pub mod entity;
pub mod message_log;
pub mod pusher;
pub mod registry;
pub mod typing;
pub mod value_object;

pub use auth::{AuthError, TokenVerifier};
pub use entity::{ChatEvent, StoredEvent};
pub use message_log::{AppendError, MessageLog};
pub use pusher::{EventPushError, EventPusher, PusherChannel};
pub use registry::MembershipRegistry;
pub use typing::TypingTracker;
pub use value_object::{
    ConnectionId, DisplayName, EventId, GroupId, MessageText, Timestamp, UserId, ValueObjectError,
};

#[cfg(test)]
pub use auth::MockTokenVerifier;
#[cfg(test)]
pub use message_log::MockMessageLog;
