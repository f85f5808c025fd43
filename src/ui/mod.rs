//! REST + WebSocket gateway built on axum.

mod auth;
mod handler;
mod runner;
mod signal;
mod state;

pub use runner::Server;
