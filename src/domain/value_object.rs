//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::ValueObjectError;

/// User identifier value object.
///
/// Client-supplied ids are arbitrary strings (the browser keeps them in
/// localStorage); server-minted ids are UUID v4. Commas are rejected because
/// the store encodes liker lists as a comma-joined column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Create a new UserId.
    ///
    /// # Returns
    ///
    /// A Result containing the UserId or an error if validation fails
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::UserIdEmpty);
        }
        let len = id.len();
        if len > 100 {
            return Err(ValueObjectError::UserIdTooLong {
                max: 100,
                actual: len,
            });
        }
        if id.contains(',') {
            return Err(ValueObjectError::UserIdInvalidChar(id));
        }
        Ok(Self(id))
    }

    /// Create a UserId from a UUID value (server-minted ids).
    pub fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid.to_string())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transport-session identifier value object.
///
/// One SessionId per WebSocket connection, generated server-side at upgrade
/// time; never reused across connections.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::SessionIdEmpty);
        }
        Ok(Self(id))
    }

    /// Create a SessionId from a UUID value.
    pub fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid.to_string())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Email value object.
///
/// Uniqueness (one user row per email) is enforced by the store, not here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// Create a new Email.
    ///
    /// Validation is intentionally shallow: non-empty, contains `@`, within
    /// the RFC length cap. Real address verification is an auth concern.
    pub fn new(email: String) -> Result<Self, ValueObjectError> {
        if email.is_empty() {
            return Err(ValueObjectError::EmailEmpty);
        }
        let len = email.len();
        if len > 254 {
            return Err(ValueObjectError::EmailTooLong {
                max: 254,
                actual: len,
            });
        }
        if !email.contains('@') {
            return Err(ValueObjectError::EmailInvalidFormat(email));
        }
        Ok(Self(email))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for Email {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message identifier value object (UUID v4, stored as its string form).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(String);

impl MessageId {
    /// Create a MessageId from an existing string.
    ///
    /// # Returns
    ///
    /// A Result containing the MessageId or an error if the string is not a
    /// valid UUID
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if uuid::Uuid::parse_str(&id).is_err() {
            return Err(ValueObjectError::MessageIdInvalidFormat(id));
        }
        Ok(Self(id))
    }

    /// Create a MessageId from a UUID value.
    pub fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid.to_string())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message text value object.
///
/// Represents displayable chat text with validation. The refresh sentinel
/// (see `entity::is_refresh_signal`) is classified on the raw string before
/// this type is ever constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageText(String);

impl MessageText {
    /// Create a new MessageText.
    ///
    /// # Returns
    ///
    /// A Result containing the MessageText or an error if validation fails
    pub fn new(text: String) -> Result<Self, ValueObjectError> {
        if text.is_empty() {
            return Err(ValueObjectError::MessageTextEmpty);
        }
        let len = text.len();
        if len > 10000 {
            return Err(ValueObjectError::MessageTextTooLong {
                max: 10000,
                actual: len,
            });
        }
        Ok(Self(text))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageText {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for MessageText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timestamp value object.
///
/// Represents a Unix timestamp in milliseconds (JST).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a new Timestamp.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_new_success() {
        // テスト項目: 有効なユーザー ID を作成できる
        // given (前提条件):
        let id = "u1".to_string();

        // when (操作):
        let result = UserId::new(id);

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(result.unwrap().as_str(), "u1");
    }

    #[test]
    fn test_user_id_new_empty_fails() {
        // テスト項目: 空のユーザー ID は作成できない
        // given (前提条件):
        let id = "".to_string();

        // when (操作):
        let result = UserId::new(id);

        // then (期待する結果):
        assert!(result.is_err());
        assert_eq!(result.unwrap_err(), ValueObjectError::UserIdEmpty);
    }

    #[test]
    fn test_user_id_new_too_long_fails() {
        // テスト項目: 101 文字以上のユーザー ID は作成できない
        // given (前提条件):
        let id = "a".repeat(101);

        // when (操作):
        let result = UserId::new(id);

        // then (期待する結果):
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::UserIdTooLong {
                max: 100,
                actual: 101
            }
        );
    }

    #[test]
    fn test_user_id_with_comma_fails() {
        // テスト項目: カンマを含むユーザー ID は作成できない
        // given (前提条件):
        let id = "u1,u2".to_string();

        // when (操作):
        let result = UserId::new(id);

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::UserIdInvalidChar("u1,u2".to_string())
        );
    }

    #[test]
    fn test_email_new_success() {
        // テスト項目: 有効なメールアドレスを作成できる
        // given (前提条件):
        let email = "alice@example.com".to_string();

        // when (操作):
        let result = Email::new(email);

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(result.unwrap().as_str(), "alice@example.com");
    }

    #[test]
    fn test_email_without_at_fails() {
        // テスト項目: '@' を含まないメールアドレスは作成できない
        // given (前提条件):
        let email = "alice.example.com".to_string();

        // when (操作):
        let result = Email::new(email);

        // then (期待する結果):
        assert!(matches!(
            result.unwrap_err(),
            ValueObjectError::EmailInvalidFormat(_)
        ));
    }

    #[test]
    fn test_message_id_rejects_non_uuid() {
        // テスト項目: UUID 形式でない文字列から MessageId は作成できない
        // given (前提条件):
        let id = "not-a-uuid".to_string();

        // when (操作):
        let result = MessageId::new(id);

        // then (期待する結果):
        assert!(matches!(
            result.unwrap_err(),
            ValueObjectError::MessageIdInvalidFormat(_)
        ));
    }

    #[test]
    fn test_message_id_from_uuid_round_trips() {
        // テスト項目: UUID から作成した MessageId は文字列経由で再作成できる
        // given (前提条件):
        let uuid = uuid::Uuid::new_v4();

        // when (操作):
        let id = MessageId::from_uuid(uuid);
        let reparsed = MessageId::new(id.as_str().to_string());

        // then (期待する結果):
        assert_eq!(reparsed.unwrap(), id);
    }

    #[test]
    fn test_message_text_new_success() {
        // テスト項目: 有効なメッセージ本文を作成できる
        // given (前提条件):
        let text = "Hello, world!".to_string();

        // when (操作):
        let result = MessageText::new(text);

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(result.unwrap().as_str(), "Hello, world!");
    }

    #[test]
    fn test_message_text_new_empty_fails() {
        // テスト項目: 空のメッセージ本文は作成できない
        // given (前提条件):
        let text = "".to_string();

        // when (操作):
        let result = MessageText::new(text);

        // then (期待する結果):
        assert!(result.is_err());
        assert_eq!(result.unwrap_err(), ValueObjectError::MessageTextEmpty);
    }

    #[test]
    fn test_message_text_new_too_long_fails() {
        // テスト項目: 10001 文字以上のメッセージ本文は作成できない
        // given (前提条件):
        let text = "a".repeat(10001);

        // when (操作):
        let result = MessageText::new(text);

        // then (期待する結果):
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::MessageTextTooLong {
                max: 10000,
                actual: 10001
            }
        );
    }

    #[test]
    fn test_timestamp_ordering() {
        // テスト項目: タイムスタンプは順序付けできる
        // given (前提条件):
        let ts1 = Timestamp::new(1000);
        let ts2 = Timestamp::new(2000);

        // then (期待する結果):
        assert!(ts1 < ts2);
        assert!(ts2 > ts1);
    }
}
