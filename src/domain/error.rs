//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// UserId validation error
    #[error("UserId cannot be empty")]
    UserIdEmpty,

    /// UserId too long error
    #[error("UserId cannot exceed {max} characters (got {actual})")]
    UserIdTooLong { max: usize, actual: usize },

    /// UserId contains a character the liker-list encoding cannot represent
    #[error("UserId cannot contain ',' (got: {0})")]
    UserIdInvalidChar(String),

    /// SessionId validation error
    #[error("SessionId cannot be empty")]
    SessionIdEmpty,

    /// Email validation error
    #[error("Email cannot be empty")]
    EmailEmpty,

    /// Email format error
    #[error("Email must contain '@' (got: {0})")]
    EmailInvalidFormat(String),

    /// Email too long error
    #[error("Email cannot exceed {max} characters (got {actual})")]
    EmailTooLong { max: usize, actual: usize },

    /// MessageId format error (not a valid UUID format)
    #[error("MessageId must be a valid UUID format (got: {0})")]
    MessageIdInvalidFormat(String),

    /// MessageText validation error
    #[error("MessageText cannot be empty")]
    MessageTextEmpty,

    /// MessageText too long error
    #[error("MessageText cannot exceed {max} characters (got {actual})")]
    MessageTextTooLong { max: usize, actual: usize },
}

/// Errors surfaced by the persistence ports
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Requested message does not exist (or is soft-deleted)
    #[error("Message with ID {0} not found")]
    MessageNotFound(String),

    /// Requested user does not exist
    #[error("User with ID {0} not found")]
    UserNotFound(String),

    /// Unique-constraint conflict (user id or email already taken)
    #[error("Conflicting user record: {0}")]
    UserConflict(String),

    /// Underlying store failure (connection, I/O, SQL)
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Errors surfaced by the event delivery port
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventPushError {
    /// Target session has no registered channel
    #[error("Session {0} not found")]
    SessionNotFound(String),

    /// Channel send failed (receiver task has gone away)
    #[error("Failed to push event: {0}")]
    PushFailed(String),
}
