//! WebSocket message DTOs.
//!
//! All frames are JSON objects tagged with a `type` field.
//! Commands flow client to server, events flow server to client.

use serde::{Deserialize, Serialize};

/// Error code: a group command arrived before authentication.
pub const ERR_UNAUTHORIZED: &str = "unauthorized";
/// Error code: the connection is not a member of the target group.
pub const ERR_NOT_MEMBER: &str = "not_member";
/// Error code: the durable log rejected the append.
pub const ERR_APPEND_FAILED: &str = "append_failed";
/// Error code: the frame could not be parsed or failed validation.
pub const ERR_INVALID_COMMAND: &str = "invalid_command";

/// Commands sent by the client.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientCommand {
    /// Present a credential. Must precede any group command.
    Authenticate { token: String },
    /// Join a group under a display name.
    JoinGroup {
        group_id: String,
        display_name: String,
    },
    /// Send a message to a group.
    SendMessage { group_id: String, text: String },
    /// Update the typing state in a group.
    Typing { group_id: String, is_typing: bool },
}

/// Events pushed by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A group message, delivered to every member except the sender.
    Message {
        id: String,
        group_id: String,
        sender_id: String,
        sender_display_name: String,
        text: String,
        timestamp: i64,
    },
    /// A member joined a group, delivered to the existing members.
    MemberJoined {
        group_id: String,
        display_name: String,
    },
    /// The full typing set of a group, delivered to every member.
    Typing {
        group_id: String,
        typing_display_names: Vec<String>,
    },
    /// Authentication failed. The connection is closed afterwards.
    ConnectError { reason: String },
    /// A command failed. Local to this connection.
    Error { code: String, message: String },
}

impl ServerEvent {
    /// Serialize to a JSON string.
    ///
    /// The enum is a plain data carrier, so serialization cannot fail.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }

    /// Build an `Error` event from a code and message.
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.to_string(),
            message: message.into(),
        }
    }
}
