//! Cross-cutting utilities shared by every layer.

pub mod logger;
pub mod time;
