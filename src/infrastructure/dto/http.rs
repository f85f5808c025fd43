//! HTTP API request/response DTOs for the chat application.
//!
//! Wire names are camelCase; timestamps are RFC 3339 strings in JST.

use serde::{Deserialize, Serialize};

use crate::common::time::timestamp_to_jst_rfc3339;
use crate::domain::{Message, User};

/// Embedded user reference in a create request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddedUserDto {
    pub id: String,
    pub email: String,
}

/// Body of `POST /api/messages`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMessageRequest {
    pub text: String,
    /// Optional author reference; unknown ids fall back to anonymous
    #[serde(default)]
    pub user: Option<EmbeddedUserDto>,
}

/// Body of `PATCH /api/messages/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMessageRequest {
    pub text: String,
}

/// Query of `DELETE /api/messages/{id}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteMessageQuery {
    /// `?soft=true` keeps the row and stamps `deletedAt`
    #[serde(default)]
    pub soft: bool,
}

/// User payload inside a message response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub id: String,
    pub email: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id.into_string(),
            email: user.email.into_string(),
        }
    }
}

/// Message payload for all REST endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: String,
    pub text: String,
    pub user: Option<UserDto>,
    pub likes: i64,
    pub liked_by: Vec<String>,
    pub created_at: String, // RFC 3339 (JST)
    pub updated_at: String, // RFC 3339 (JST)
    pub deleted_at: Option<String>,
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self {
            id: message.id.into_string(),
            text: message.text.into_string(),
            user: message.author.map(UserDto::from),
            likes: message.likes,
            liked_by: message
                .liked_by
                .into_iter()
                .map(|id| id.into_string())
                .collect(),
            created_at: timestamp_to_jst_rfc3339(message.created_at.value()),
            updated_at: timestamp_to_jst_rfc3339(message.updated_at.value()),
            deleted_at: message
                .deleted_at
                .map(|ts| timestamp_to_jst_rfc3339(ts.value())),
        }
    }
}
