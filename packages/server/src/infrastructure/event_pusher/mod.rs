//! イベント配信の実装
//!
//! ## 概要
//!
//! このモジュールは `EventPusher` trait の具体的な実装を提供します。
//!
//! ## 実装
//!
//! - `websocket`: WebSocket を使った実装

pub mod websocket;

pub use websocket::WebSocketEventPusher;
