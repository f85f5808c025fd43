//! Infrastructure 層
//!
//! ドメイン層が定義するポート（Repository / EventPusher）の具体的な実装と、
//! REST / WebSocket の DTO を提供します。

pub mod dto;
pub mod pusher;
pub mod repository;
