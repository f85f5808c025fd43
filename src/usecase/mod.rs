//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層を操作します。

pub mod disconnect_client;
pub mod error;
pub mod message_service;
pub mod post_message;
pub mod register_client;
pub mod toggle_like;

pub use disconnect_client::DisconnectClientUseCase;
pub use error::{MessageServiceError, PostMessageError, RegisterError, ToggleLikeError};
pub use message_service::MessageService;
pub use post_message::{PostMessageUseCase, PostOutcome};
pub use register_client::{IdentityCorrection, RegisterClientUseCase, Registration};
pub use toggle_like::ToggleLikeUseCase;
