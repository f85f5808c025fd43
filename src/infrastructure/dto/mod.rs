//! Data transfer objects for the REST API and the WebSocket wire protocol.

pub mod http;
pub mod websocket;
