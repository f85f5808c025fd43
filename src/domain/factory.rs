//! Domain factories for generating identifiers.

use super::value_object::{MessageId, SessionId, UserId};

/// Factory for generating MessageId instances.
///
/// Encapsulates id generation, separating it from the validation logic in
/// MessageId.
pub struct MessageIdFactory;

impl MessageIdFactory {
    /// Generate a new MessageId with a random UUID v4.
    pub fn generate() -> MessageId {
        MessageId::from_uuid(uuid::Uuid::new_v4())
    }
}

/// Factory for generating SessionId instances.
///
/// The server assigns one per accepted socket; clients never choose their
/// own session id.
pub struct SessionIdFactory;

impl SessionIdFactory {
    /// Generate a new SessionId with a random UUID v4.
    pub fn generate() -> SessionId {
        SessionId::from_uuid(uuid::Uuid::new_v4())
    }
}

/// Factory for generating UserId instances.
///
/// Used when a client claims an id already owned by a different email and a
/// replacement must be minted.
pub struct UserIdFactory;

impl UserIdFactory {
    /// Generate a new UserId with a random UUID v4.
    pub fn generate() -> UserId {
        UserId::from_uuid(uuid::Uuid::new_v4())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_id_factory_generate() {
        // テスト項目: MessageIdFactory::generate() で UUID v4 形式の ID を生成できる
        // when (操作):
        let message_id = MessageIdFactory::generate();

        // then (期待する結果):
        // UUID v4 形式であることを確認（長さと形式）
        assert_eq!(message_id.as_str().len(), 36); // UUID v4 の標準長（ハイフン含む）
    }

    #[test]
    fn test_message_id_factory_generate_uniqueness() {
        // テスト項目: MessageIdFactory::generate() は毎回異なる ID を生成する
        // when (操作):
        let id1 = MessageIdFactory::generate();
        let id2 = MessageIdFactory::generate();

        // then (期待する結果):
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_session_id_factory_generate_uniqueness() {
        // テスト項目: SessionIdFactory::generate() は毎回異なる ID を生成する
        // when (操作):
        let id1 = SessionIdFactory::generate();
        let id2 = SessionIdFactory::generate();

        // then (期待する結果):
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_user_id_factory_generate_is_valid() {
        // テスト項目: UserIdFactory::generate() は検証を通る ID を生成する
        // when (操作):
        let user_id = UserIdFactory::generate();

        // then (期待する結果): 再検証してもエラーにならない
        let revalidated = UserId::new(user_id.as_str().to_string());
        assert!(revalidated.is_ok());
    }
}
