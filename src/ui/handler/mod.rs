//! HTTP / WebSocket handlers.

mod http;
mod websocket;

pub use http::{
    create_message, debug_roster, delete_message, get_message, get_messages, health_check,
    update_message,
};
pub use websocket::websocket_handler;
