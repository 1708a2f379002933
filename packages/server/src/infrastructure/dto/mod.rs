//! Data Transfer Objects (DTOs) for the messaging coordinator.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket command / event DTOs
//! - `http`: HTTP API response DTOs

pub mod conversion;
pub mod http;
pub mod websocket;
