//! WebSocket connection handlers.

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
    common::time::get_jst_timestamp,
    domain::{RosterEntry, SessionId, SessionIdFactory, Timestamp},
    infrastructure::dto::websocket::{
        BroadcastMessage, ClientEvent, ClientIdentity, ErrorDto, IdentityUpdate, LikeUpdate,
        RosterClientDto, ServerEvent,
    },
    ui::state::AppState,
    usecase::{PostOutcome, ToggleLikeError},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    // Session IDs are server-minted; the user identity arrives later
    // via a clientConnected frame.
    let session_id = SessionIdFactory::generate();

    // Create a channel for this session to receive pushed events
    let (tx, rx) = mpsc::unbounded_channel();
    state
        .event_pusher
        .register_session(session_id.clone(), tx)
        .await;
    tracing::info!("Session '{}' connected", session_id);

    ws.on_upgrade(move |socket| handle_socket(socket, state, session_id, rx))
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    session_id: SessionId,
    mut rx: mpsc::UnboundedReceiver<String>,
) {
    let (mut sender, mut receiver) = socket.split();

    let session_id_clone = session_id.clone();
    let state_clone = state.clone();

    // Spawn a task to receive events from this session's client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    // Parse the incoming frame
                    let event = match serde_json::from_str::<ClientEvent>(&text) {
                        Ok(event) => event,
                        Err(e) => {
                            // Unknown or malformed frames are dropped, not fatal
                            tracing::warn!("Failed to parse frame as client event: {}", e);
                            continue;
                        }
                    };

                    dispatch_event(&state_clone, &session_id_clone, event).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Session '{}' requested close", session_id_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to forward pushed events to this session's socket
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Unregister the push channel first so late broadcasts skip this socket
    state.event_pusher.unregister_session(&session_id).await;

    match state.disconnect_client_usecase.execute(&session_id).await {
        Some(snapshot) => {
            tracing::info!("Session '{}' disconnected, roster updated", session_id);
            broadcast_roster(&state, snapshot).await;
        }
        None => {
            // Never registered, or superseded by a newer session of the same user
            tracing::debug!("Session '{}' left without roster change", session_id);
        }
    }
}

/// Route one inbound frame to its use case
async fn dispatch_event(state: &Arc<AppState>, session_id: &SessionId, event: ClientEvent) {
    match event {
        ClientEvent::ClientConnected(identity) => {
            handle_client_connected(state, session_id, identity).await;
        }
        ClientEvent::MessageFromClient(message) => {
            handle_message_from_client(state, session_id, message.text).await;
        }
        ClientEvent::ToggleLike(request) => {
            handle_toggle_like(state, session_id, request.message_id).await;
        }
    }
}

async fn handle_client_connected(
    state: &Arc<AppState>,
    session_id: &SessionId,
    identity: ClientIdentity,
) {
    let claimed_id = identity.id.clone();

    match state
        .register_client_usecase
        .execute(session_id.clone(), identity.id, identity.email)
        .await
    {
        Ok(registration) => {
            tracing::info!(
                "Session '{}' registered as user '{}'",
                session_id,
                registration.user.id
            );

            broadcast_roster(state, registration.roster).await;

            // The correction goes to the originating session only
            if let Some(correction) = registration.correction {
                let event = ServerEvent::UserIdUpdate(IdentityUpdate {
                    old_id: correction.old_id.into_string(),
                    new_id: correction.new_id.into_string(),
                    email: correction.email.into_string(),
                });
                push_to_origin(state, session_id, &event).await;
            }
        }
        Err(e) => {
            // No wire event exists for a rejected identity claim; the session
            // simply stays anonymous.
            tracing::warn!(
                "Rejected identity claim '{}' on session '{}': {}",
                claimed_id,
                session_id,
                e
            );
        }
    }
}

async fn handle_message_from_client(state: &Arc<AppState>, session_id: &SessionId, text: String) {
    match state.post_message_usecase.execute(session_id, text).await {
        Ok(PostOutcome::Refresh { text }) => {
            let now = Timestamp::new(get_jst_timestamp());
            let event = ServerEvent::MessageFromServer(BroadcastMessage::refresh(text, now));
            broadcast_event(state, &event).await;
        }
        Ok(PostOutcome::Persisted(message)) => {
            tracing::info!("Message '{}' stored and broadcast", message.id);

            let author_connected = match message.author.as_ref() {
                Some(author) => state.roster.lock().await.is_connected(&author.id),
                None => false,
            };
            let event = ServerEvent::MessageFromServer(BroadcastMessage::persisted(
                message,
                author_connected,
            ));
            broadcast_event(state, &event).await;
        }
        Ok(PostOutcome::Ephemeral { text, created_at }) => {
            let event =
                ServerEvent::MessageFromServer(BroadcastMessage::ephemeral(text, created_at));
            broadcast_event(state, &event).await;
        }
        Err(e) => {
            // Nothing was stored, so nothing is broadcast; only the origin hears
            tracing::warn!(
                "Message from session '{}' was not stored: {}",
                session_id,
                e
            );
            let event = ServerEvent::MessageError(ErrorDto {
                error: "The message could not be saved".to_string(),
                details: Some(e.to_string()),
            });
            push_to_origin(state, session_id, &event).await;
        }
    }
}

async fn handle_toggle_like(
    state: &Arc<AppState>,
    session_id: &SessionId,
    raw_message_id: String,
) {
    match state
        .toggle_like_usecase
        .execute(session_id, raw_message_id)
        .await
    {
        Ok(message) => {
            tracing::info!(
                "Like toggled on message '{}' (likes: {})",
                message.id,
                message.likes
            );
            let event = ServerEvent::MessageLikeUpdate(LikeUpdate::from(message));
            broadcast_event(state, &event).await;
        }
        Err(ToggleLikeError::NotRegistered) => {
            let event = ServerEvent::LikeError(ErrorDto {
                error: "You must be signed in to like a message".to_string(),
                details: None,
            });
            push_to_origin(state, session_id, &event).await;
        }
        Err(e) => {
            tracing::warn!("Like toggle failed on session '{}': {}", session_id, e);
            let event = ServerEvent::LikeError(ErrorDto {
                error: "The like could not be saved".to_string(),
                details: Some(e.to_string()),
            });
            push_to_origin(state, session_id, &event).await;
        }
    }
}

/// Broadcast the full roster as a connectedClients frame
async fn broadcast_roster(state: &Arc<AppState>, snapshot: Vec<RosterEntry>) {
    let event = ServerEvent::ConnectedClients(
        snapshot.into_iter().map(RosterClientDto::from).collect(),
    );
    broadcast_event(state, &event).await;
}

async fn broadcast_event(state: &Arc<AppState>, event: &ServerEvent) {
    let payload = serde_json::to_string(event).unwrap();
    if let Err(e) = state.event_pusher.broadcast_all(&payload).await {
        tracing::warn!("Broadcast failed: {}", e);
    }
}

async fn push_to_origin(state: &Arc<AppState>, session_id: &SessionId, event: &ServerEvent) {
    let payload = serde_json::to_string(event).unwrap();
    if let Err(e) = state.event_pusher.push_to(session_id, &payload).await {
        tracing::warn!("Failed to push event to session '{}': {}", session_id, e);
    }
}
