//! Core domain models for the chat application.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::value_object::{Email, MessageId, MessageText, SessionId, Timestamp, UserId};

/// Text sentinel the browser client emits after a REST create to make other
/// clients refetch the feed. It is relayed over the socket but is not a
/// displayable message and must never reach the store.
pub const REFRESH_SENTINEL: &str = "newMessage";

/// Classify raw inbound socket text as a feed-refresh signal.
///
/// Blank text and the sentinel are both treated as refresh signals; neither
/// belongs in the message feed.
pub fn is_refresh_signal(raw_text: &str) -> bool {
    raw_text.trim().is_empty() || raw_text == REFRESH_SENTINEL
}

/// Represents a chat user (persisted identity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User identifier (stable across sessions)
    pub id: UserId,
    /// Email address (unique in the store)
    pub email: Email,
}

impl User {
    /// Create a new user
    pub fn new(id: UserId, email: Email) -> Self {
        Self { id, email }
    }
}

/// Represents a chat message in the domain model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message identifier
    pub id: MessageId,
    /// Message text
    pub text: MessageText,
    /// Author; `None` for anonymous messages
    pub author: Option<User>,
    /// Like count, kept in step with `liked_by`
    pub likes: i64,
    /// Ids of users who liked this message. A list, not a set: duplicates
    /// are prevented only by the linear search in `toggle_like`.
    pub liked_by: Vec<UserId>,
    /// Timestamp when the message was created
    pub created_at: Timestamp,
    /// Timestamp of the last mutation
    pub updated_at: Timestamp,
    /// Soft-delete timestamp; `Some` means the row is hidden from the feed
    pub deleted_at: Option<Timestamp>,
}

impl Message {
    /// Create a new message with zero likes
    pub fn new(
        id: MessageId,
        text: MessageText,
        author: Option<User>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            text,
            author,
            likes: 0,
            liked_by: Vec::new(),
            created_at,
            updated_at: created_at,
            deleted_at: None,
        }
    }

    /// Flip membership of `user_id` in the liker list and adjust the count.
    ///
    /// Insert if absent (+1), remove if present (-1). Toggling twice by the
    /// same user restores the original state.
    pub fn toggle_like(&mut self, user_id: &UserId) {
        match self.liked_by.iter().position(|id| id == user_id) {
            Some(pos) => {
                self.liked_by.remove(pos);
                self.likes -= 1;
            }
            None => {
                self.liked_by.push(user_id.clone());
                self.likes += 1;
            }
        }
    }

    /// Whether `user_id` is currently in the liker list
    pub fn is_liked_by(&self, user_id: &UserId) -> bool {
        self.liked_by.iter().any(|id| id == user_id)
    }

    /// Whether the message has been soft-deleted
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// One known client in the presence roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Transport session currently (or last) associated with the user
    pub session_id: SessionId,
    /// Resolved user identity
    pub user: User,
    /// Whether the session is currently connected
    pub connected: bool,
    /// Timestamp of the last connect or disconnect
    pub last_seen: Timestamp,
}

/// In-memory presence roster.
///
/// Entries are keyed by stable user id; the transport session id is a
/// secondary lookup index. At most one entry exists per user: registering a
/// user who already has an entry overwrites it and unlinks the superseded
/// session, so a late disconnect from the abandoned session is a no-op.
/// Entries are never removed — disconnecting only flips the `connected`
/// flag and refreshes `last_seen`. Process lifetime only.
#[derive(Debug, Default)]
pub struct Roster {
    entries: HashMap<UserId, RosterEntry>,
    sessions: HashMap<SessionId, UserId>,
}

impl Roster {
    /// Create an empty roster
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `user` under `session_id`, marking it connected.
    ///
    /// A previous entry for the same user (connected or not) is overwritten;
    /// its session is dropped from the index.
    pub fn register(&mut self, session_id: SessionId, user: User, now: Timestamp) {
        if let Some(prev) = self.entries.get(&user.id) {
            self.sessions.remove(&prev.session_id);
        }
        self.sessions.insert(session_id.clone(), user.id.clone());
        self.entries.insert(
            user.id.clone(),
            RosterEntry {
                session_id,
                user,
                connected: true,
                last_seen: now,
            },
        );
    }

    /// Mark the entry owning `session_id` disconnected and stamp `last_seen`.
    ///
    /// The entry stays in the roster. Returns `false` when the session is
    /// unknown or was superseded by a newer registration.
    pub fn disconnect(&mut self, session_id: &SessionId, now: Timestamp) -> bool {
        let Some(user_id) = self.sessions.remove(session_id) else {
            return false;
        };
        match self.entries.get_mut(&user_id) {
            Some(entry) => {
                entry.connected = false;
                entry.last_seen = now;
                true
            }
            None => false,
        }
    }

    /// Resolved user for a registered session, if any
    pub fn user_for_session(&self, session_id: &SessionId) -> Option<&User> {
        let user_id = self.sessions.get(session_id)?;
        self.entries.get(user_id).map(|entry| &entry.user)
    }

    /// Whether the user currently has a connected session
    pub fn is_connected(&self, user_id: &UserId) -> bool {
        self.entries
            .get(user_id)
            .map(|entry| entry.connected)
            .unwrap_or(false)
    }

    /// Full roster snapshot, sorted by user id for deterministic broadcasts
    pub fn snapshot(&self) -> Vec<RosterEntry> {
        let mut entries: Vec<RosterEntry> = self.entries.values().cloned().collect();
        entries.sort_by(|a, b| a.user.id.cmp(&b.user.id));
        entries
    }

    /// Number of known entries (connected or not)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the roster has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
