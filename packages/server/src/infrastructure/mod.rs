//! Infrastructure 層
//!
//! ドメイン層の trait（EventPusher, MessageLog, TokenVerifier）の
//! 具体的な実装と、ワイヤフォーマット（DTO）を提供します。

pub mod auth;
pub mod dto;
pub mod event_pusher;
pub mod message_log;
