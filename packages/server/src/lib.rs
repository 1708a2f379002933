//! Group-messaging coordinator library.
//!
//! Fans chat messages out to members of named groups over WebSocket, tracks
//! ephemeral typing state, and appends every message to a durable message
//! log that clients read independently of live delivery.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
