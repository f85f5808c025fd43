//! イベント配信（通知）の実装
//!
//! このモジュールは `EventPusher` trait の具体的な実装を提供します。

pub mod websocket;

pub use websocket::WebSocketEventPusher;
