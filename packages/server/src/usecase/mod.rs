//! UseCase 層
//!
//! Session Manager の各操作を 1 ユースケース 1 モジュールで実装します。
//! ドメイン層の trait（EventPusher, MessageLog）とインメモリ状態
//! （MembershipRegistry, TypingTracker）のみに依存します。

pub mod disconnect;
pub mod error;
pub mod group_query;
pub mod join_group;
pub mod send_message;
pub mod set_typing;

pub use disconnect::{DisconnectUseCase, GroupTypingUpdate};
pub use error::{SendMessageError, SetTypingError};
pub use group_query::{GroupDetail, GroupQueryUseCase, GroupSummary};
pub use join_group::{JoinGroupUseCase, JoinOutcome};
pub use send_message::{SendMessageUseCase, SendOutcome};
pub use set_typing::{SetTypingUseCase, TypingOutcome};
