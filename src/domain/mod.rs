//! Domain layer for the chat application.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod factory;
pub mod pusher;
pub mod repository;
pub mod value_object;

pub use entity::{Message, REFRESH_SENTINEL, Roster, RosterEntry, User, is_refresh_signal};
pub use error::{EventPushError, RepositoryError, ValueObjectError};
pub use factory::{MessageIdFactory, SessionIdFactory, UserIdFactory};
pub use pusher::{EventPusher, PusherChannel};
pub use repository::{MessageRepository, UserRepository};
pub use value_object::{Email, MessageId, MessageText, SessionId, Timestamp, UserId};
