//! WebSocket connection handlers.
//!
//! One connection maps to one session:
//!
//! - `pusher_loop` drains the connection's channel into the WebSocket sink,
//!   so every event queued for this connection is delivered in FIFO order.
//! - `session_loop` reads command frames, enforces the authentication gate
//!   and dispatches to the usecases.
//!
//! A failed command is reported to this connection only and never tears
//! down the session. Authentication failure is the exception: the session
//! receives a `connect_error` event and is then closed.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, DisplayName, GroupId, MessageText, UserId},
    infrastructure::dto::{
        conversion::message_event,
        websocket::{
            ClientCommand, ERR_APPEND_FAILED, ERR_INVALID_COMMAND, ERR_NOT_MEMBER,
            ERR_UNAUTHORIZED, ServerEvent,
        },
    },
    ui::state::AppState,
    usecase::{SendMessageError, SetTypingError},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives events from the rx channel and pushes them to the WebSocket sender.
///
/// This function handles the outbound event flow: events queued for this
/// connection (via rx channel) are sent to its WebSocket sink.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            // Send the event to this connection
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let conn_id = ConnectionId::generate();
    let (sender, receiver) = socket.split();

    // Create a channel for this connection to receive events
    let (tx, rx) = mpsc::unbounded_channel();
    state.pusher.register_connection(conn_id, tx).await;
    tracing::info!("Connection '{}' established", conn_id);

    let mut send_task = pusher_loop(rx, sender);
    let state_clone = state.clone();
    let mut recv_task = tokio::spawn(async move {
        session_loop(receiver, state_clone, conn_id).await;
    });

    tokio::select! {
        _ = &mut recv_task => {
            // Cleanup drops this connection's sender, so the pusher loop
            // drains the remaining queued events and then closes the socket.
            cleanup(&state, conn_id).await;
            let _ = send_task.await;
        }
        _ = &mut send_task => {
            recv_task.abort();
            cleanup(&state, conn_id).await;
        }
    };

    tracing::info!("Connection '{}' closed", conn_id);
}

/// Purge all coordinator state for a closed connection and broadcast the
/// resulting typing updates. No member-left event is emitted.
async fn cleanup(state: &Arc<AppState>, conn_id: ConnectionId) {
    let updates = state.disconnect_usecase.execute(conn_id).await;
    for update in updates {
        let event = ServerEvent::Typing {
            group_id: update.group_id.into_string(),
            typing_display_names: update
                .typing_names
                .into_iter()
                .map(|name| name.into_string())
                .collect(),
        };
        state
            .disconnect_usecase
            .broadcast_typing_update(update.recipients, &event.to_json())
            .await;
    }
}

/// Queue an error event for this connection.
async fn push_error(state: &Arc<AppState>, conn_id: ConnectionId, code: &str, message: &str) {
    let event = ServerEvent::error(code, message);
    if let Err(e) = state.pusher.push_to(conn_id, &event.to_json()).await {
        tracing::warn!("Failed to push error to connection '{}': {}", conn_id, e);
    }
}

async fn session_loop(
    mut receiver: futures_util::stream::SplitStream<WebSocket>,
    state: Arc<AppState>,
    conn_id: ConnectionId,
) {
    // Set after a successful authenticate command
    let mut authenticated: Option<UserId> = None;

    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                tracing::error!("WebSocket error on connection '{}': {}", conn_id, e);
                break;
            }
        };

        match msg {
            Message::Text(text) => {
                let command = match serde_json::from_str::<ClientCommand>(&text) {
                    Ok(command) => command,
                    Err(e) => {
                        tracing::warn!("Failed to parse command as JSON: {}", e);
                        push_error(&state, conn_id, ERR_INVALID_COMMAND, "malformed command")
                            .await;
                        continue;
                    }
                };

                if let ClientCommand::Authenticate { token } = &command {
                    match state.verifier.verify(token).await {
                        Ok(user_id) => {
                            tracing::info!(
                                "Connection '{}' authenticated as '{}'",
                                conn_id,
                                user_id.as_str()
                            );
                            authenticated = Some(user_id);
                        }
                        Err(e) => {
                            tracing::warn!(
                                "Authentication failed on connection '{}': {}",
                                conn_id,
                                e
                            );
                            let event = ServerEvent::ConnectError {
                                reason: e.to_string(),
                            };
                            if let Err(e) =
                                state.pusher.push_to(conn_id, &event.to_json()).await
                            {
                                tracing::warn!("Failed to push connect_error: {}", e);
                            }
                            break;
                        }
                    }
                    continue;
                }

                // Authentication gate: group commands before authenticate
                // are rejected and dropped, the connection stays open
                let Some(user_id) = authenticated.clone() else {
                    push_error(&state, conn_id, ERR_UNAUTHORIZED, "authenticate first").await;
                    continue;
                };

                handle_group_command(&state, conn_id, user_id, command).await;
            }
            Message::Ping(_) => {
                tracing::debug!("Received ping from connection '{}'", conn_id);
                // Ping/pong is handled automatically by the WebSocket protocol
            }
            Message::Close(_) => {
                tracing::info!("Connection '{}' requested close", conn_id);
                break;
            }
            _ => {}
        }
    }
}

async fn handle_group_command(
    state: &Arc<AppState>,
    conn_id: ConnectionId,
    user_id: UserId,
    command: ClientCommand,
) {
    match command {
        // Handled by the caller
        ClientCommand::Authenticate { .. } => {}
        ClientCommand::JoinGroup {
            group_id,
            display_name,
        } => {
            // Convert String -> Domain Models
            let (group_id, display_name) = match (
                GroupId::try_from(group_id),
                DisplayName::try_from(display_name),
            ) {
                (Ok(group_id), Ok(display_name)) => (group_id, display_name),
                (Err(e), _) | (_, Err(e)) => {
                    push_error(state, conn_id, ERR_INVALID_COMMAND, &e.to_string()).await;
                    return;
                }
            };

            let joined_event = ServerEvent::MemberJoined {
                group_id: group_id.as_str().to_string(),
                display_name: display_name.as_str().to_string(),
            };
            let outcome = state
                .join_group_usecase
                .execute(conn_id, group_id, display_name)
                .await;
            state
                .join_group_usecase
                .broadcast_member_joined(outcome.notice_targets, &joined_event.to_json())
                .await;
        }
        ClientCommand::SendMessage { group_id, text } => {
            let (group_id, text) =
                match (GroupId::try_from(group_id), MessageText::try_from(text)) {
                    (Ok(group_id), Ok(text)) => (group_id, text),
                    (Err(e), _) | (_, Err(e)) => {
                        push_error(state, conn_id, ERR_INVALID_COMMAND, &e.to_string()).await;
                        return;
                    }
                };

            match state
                .send_message_usecase
                .execute(conn_id, user_id, group_id, text)
                .await
            {
                Ok(outcome) => {
                    let event = message_event(&outcome.event_id, &outcome.event);
                    state
                        .send_message_usecase
                        .broadcast(outcome.recipients, &event.to_json())
                        .await;
                    // The append failure is reported to the sender only,
                    // after the live broadcast
                    if !outcome.appended {
                        push_error(
                            state,
                            conn_id,
                            ERR_APPEND_FAILED,
                            "message was delivered but not stored",
                        )
                        .await;
                    }
                }
                Err(SendMessageError::NotMember(group_id)) => {
                    push_error(
                        state,
                        conn_id,
                        ERR_NOT_MEMBER,
                        &format!("join group '{group_id}' before sending"),
                    )
                    .await;
                }
            }
        }
        ClientCommand::Typing {
            group_id,
            is_typing,
        } => {
            let group_id = match GroupId::try_from(group_id) {
                Ok(group_id) => group_id,
                Err(e) => {
                    push_error(state, conn_id, ERR_INVALID_COMMAND, &e.to_string()).await;
                    return;
                }
            };

            let group_id_str = group_id.as_str().to_string();
            match state
                .set_typing_usecase
                .execute(conn_id, group_id, is_typing)
                .await
            {
                Ok(outcome) => {
                    let event = ServerEvent::Typing {
                        group_id: group_id_str,
                        typing_display_names: outcome
                            .typing_names
                            .into_iter()
                            .map(|name| name.into_string())
                            .collect(),
                    };
                    state
                        .set_typing_usecase
                        .broadcast(outcome.recipients, &event.to_json())
                        .await;
                }
                Err(SetTypingError::NotMember(group_id)) => {
                    push_error(
                        state,
                        conn_id,
                        ERR_NOT_MEMBER,
                        &format!("join group '{group_id}' before typing"),
                    )
                    .await;
                }
            }
        }
    }
}
