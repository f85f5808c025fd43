//! インメモリ Repository 実装

pub mod message;
pub mod user;

pub use message::InMemoryMessageRepository;
pub use user::InMemoryUserRepository;
