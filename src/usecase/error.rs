//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{RepositoryError, ValueObjectError};

/// メッセージサービス（CRUD + いいねトグル）のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessageServiceError {
    /// 入力バリデーション失敗（空文字、長すぎる本文など）
    #[error("Invalid input: {0}")]
    Validation(ValueObjectError),

    /// 対象メッセージが存在しない（または論理削除済み）
    #[error("Message with ID {0} not found")]
    NotFound(String),

    /// 紐付け先のユーザーが存在しない
    #[error("User with ID {0} not found")]
    UnknownUser(String),

    /// ストアの障害
    #[error("Storage failure: {0}")]
    Storage(String),
}

impl From<ValueObjectError> for MessageServiceError {
    fn from(e: ValueObjectError) -> Self {
        Self::Validation(e)
    }
}

impl From<RepositoryError> for MessageServiceError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::MessageNotFound(id) => Self::NotFound(id),
            RepositoryError::UserNotFound(id) => Self::UnknownUser(id),
            RepositoryError::UserConflict(detail) | RepositoryError::Storage(detail) => {
                Self::Storage(detail)
            }
        }
    }
}

/// クライアント登録（clientConnected）のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegisterError {
    /// 申告された ID / email が不正
    #[error("Invalid identity: {0}")]
    InvalidIdentity(#[from] ValueObjectError),
}

/// メッセージ投稿（messageFromClient）のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PostMessageError {
    /// 本文のバリデーション失敗
    #[error("Invalid message text: {0}")]
    InvalidText(ValueObjectError),

    /// 永続化失敗。persist-then-broadcast のため、このとき何も配信されない
    #[error("Failed to store message: {0}")]
    Store(MessageServiceError),
}

impl From<ValueObjectError> for PostMessageError {
    fn from(e: ValueObjectError) -> Self {
        Self::InvalidText(e)
    }
}

impl From<MessageServiceError> for PostMessageError {
    fn from(e: MessageServiceError) -> Self {
        match e {
            MessageServiceError::Validation(v) => Self::InvalidText(v),
            other => Self::Store(other),
        }
    }
}

/// いいねトグル（toggleLike）のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ToggleLikeError {
    /// messageId が UUID 形式でない
    #[error("Invalid message ID: {0}")]
    InvalidMessageId(#[from] ValueObjectError),

    /// セッションにユーザーが紐付いていない（clientConnected 未送信）
    #[error("Session has no registered user")]
    NotRegistered,

    /// 対象メッセージが存在しない
    #[error("Message with ID {0} not found")]
    MessageNotFound(String),

    /// ストアの障害
    #[error("Storage failure: {0}")]
    Storage(String),
}

impl From<MessageServiceError> for ToggleLikeError {
    fn from(e: MessageServiceError) -> Self {
        match e {
            MessageServiceError::Validation(v) => Self::InvalidMessageId(v),
            MessageServiceError::NotFound(id) => Self::MessageNotFound(id),
            MessageServiceError::UnknownUser(id) => {
                Self::Storage(format!("liker user {id} not found"))
            }
            MessageServiceError::Storage(detail) => Self::Storage(detail),
        }
    }
}
