//! Shared utilities for the Tamariba group-messaging coordinator.
//!
//! Cross-cutting concerns used by the server binary and its tests:
//! clock abstraction and logging setup.

pub mod logger;
pub mod time;
