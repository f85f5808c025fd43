//! WebSocket event DTOs for the chat application.
//!
//! Every frame is a single JSON object `{"event": ..., "data": ...}`.
//! Event names and field names are camelCase; they are the contract the
//! browser client consumes, so the serde shape tests below pin them down.

use serde::{Deserialize, Serialize};

use crate::common::time::timestamp_to_jst_rfc3339;
use crate::domain::{Message, MessageText, RosterEntry, Timestamp};

/// Inbound frames (client → server)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Raw chat text (or the refresh sentinel)
    MessageFromClient(ClientMessage),
    /// Like toggle request
    ToggleLike(ToggleLikeRequest),
    /// Identity claim from the client's localStorage
    ClientConnected(ClientIdentity),
}

/// Outbound frames (server → clients)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Chat text fan-out (persisted, ephemeral or refresh signal)
    MessageFromServer(BroadcastMessage),
    /// Like state fan-out after a toggle
    MessageLikeUpdate(LikeUpdate),
    /// Full roster fan-out after a register/disconnect
    ConnectedClients(Vec<RosterClientDto>),
    /// Post failure, sent to the originating session only
    MessageError(ErrorDto),
    /// Like failure, sent to the originating session only
    LikeError(ErrorDto),
    /// Identity correction, sent to the originating session only
    UserIdUpdate(IdentityUpdate),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientMessage {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleLikeRequest {
    pub message_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientIdentity {
    pub id: String,
    pub email: String,
}

/// Author payload inside a broadcast message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadcastUserDto {
    pub id: String,
    pub email: String,
    pub connected: bool,
}

/// Payload of `messageFromServer`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastMessage {
    /// Store id; absent for ephemeral and refresh frames
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<String>,
    pub text: String,
    pub user: Option<BroadcastUserDto>,
    pub likes: i64,
    pub liked_by: Vec<String>,
    pub created_at: String, // RFC 3339 (JST)
}

impl BroadcastMessage {
    /// Frame for a store-accepted message (authenticated post path)
    pub fn persisted(message: Message, author_connected: bool) -> Self {
        Self {
            id: Some(message.id.into_string()),
            text: message.text.into_string(),
            user: message.author.map(|author| BroadcastUserDto {
                id: author.id.into_string(),
                email: author.email.into_string(),
                connected: author_connected,
            }),
            likes: message.likes,
            liked_by: message
                .liked_by
                .into_iter()
                .map(|id| id.into_string())
                .collect(),
            created_at: timestamp_to_jst_rfc3339(message.created_at.value()),
        }
    }

    /// Frame for an anonymous session's live-only text (nothing stored)
    pub fn ephemeral(text: MessageText, created_at: Timestamp) -> Self {
        Self {
            id: None,
            text: text.into_string(),
            user: None,
            likes: 0,
            liked_by: Vec::new(),
            created_at: timestamp_to_jst_rfc3339(created_at.value()),
        }
    }

    /// Frame relaying a feed-refresh signal verbatim
    pub fn refresh(text: String, now: Timestamp) -> Self {
        Self {
            id: None,
            text,
            user: None,
            likes: 0,
            liked_by: Vec::new(),
            created_at: timestamp_to_jst_rfc3339(now.value()),
        }
    }
}

/// Payload of `messageLikeUpdate`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeUpdate {
    pub message_id: String,
    pub likes: i64,
    pub liked_by: Vec<String>,
}

impl From<Message> for LikeUpdate {
    fn from(message: Message) -> Self {
        Self {
            message_id: message.id.into_string(),
            likes: message.likes,
            liked_by: message
                .liked_by
                .into_iter()
                .map(|id| id.into_string())
                .collect(),
        }
    }
}

/// One entry of the `connectedClients` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterClientDto {
    pub client_id: String,
    pub user: RosterUserDto,
    pub connected: bool,
    pub last_connected: String, // RFC 3339 (JST)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterUserDto {
    pub id: String,
    pub email: String,
}

impl From<RosterEntry> for RosterClientDto {
    fn from(entry: RosterEntry) -> Self {
        Self {
            client_id: entry.session_id.into_string(),
            user: RosterUserDto {
                id: entry.user.id.into_string(),
                email: entry.user.email.into_string(),
            },
            connected: entry.connected,
            last_connected: timestamp_to_jst_rfc3339(entry.last_seen.value()),
        }
    }
}

/// Payload of `messageError` / `likeError`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDto {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub details: Option<String>,
}

/// Payload of `userIdUpdate`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityUpdate {
    pub old_id: String,
    pub new_id: String,
    pub email: String,
}
