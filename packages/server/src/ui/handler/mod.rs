//! HTTP and WebSocket endpoint handlers.

mod http;
mod websocket;

pub use http::{group_detail, group_messages, health_check, list_groups};
pub use websocket::websocket_handler;
