//! SQLite User Repository 実装
//!
//! `users` テーブル（id 主キー、email UNIQUE）。一意制約違反は
//! `UserConflict` に写像し、resolve-or-create の再解決経路に乗せる。

use std::sync::Arc;

use rusqlite::{Connection, ErrorCode, OptionalExtension, params};
use tokio::sync::Mutex;

use crate::domain::{Email, RepositoryError, User, UserId, UserRepository};

use super::storage_error;

/// SQLite User Repository 実装
pub struct SqliteUserRepository {
    /// 共有コネクション（SqliteStore が所有）
    conn: Arc<Mutex<Connection>>,
}

impl SqliteUserRepository {
    /// 新しい SqliteUserRepository を作成
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }
}

fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<(String, String)> {
    Ok((row.get("id")?, row.get("email")?))
}

fn into_domain((id, email): (String, String)) -> Result<User, RepositoryError> {
    let corrupt =
        |e: crate::domain::ValueObjectError| RepositoryError::Storage(format!("corrupt row: {e}"));
    Ok(User::new(
        UserId::new(id).map_err(corrupt)?,
        Email::new(email).map_err(corrupt)?,
    ))
}

#[async_trait::async_trait]
impl UserRepository for SqliteUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<User, RepositoryError> {
        let conn = self.conn.lock().await;
        let row = conn
            .query_row(
                "SELECT id, email FROM users WHERE id = ?1",
                params![id.as_str()],
                user_from_row,
            )
            .optional()
            .map_err(storage_error)?;
        match row {
            Some(row) => into_domain(row),
            None => Err(RepositoryError::UserNotFound(id.as_str().to_string())),
        }
    }

    async fn find_by_email(&self, email: &Email) -> Result<User, RepositoryError> {
        let conn = self.conn.lock().await;
        let row = conn
            .query_row(
                "SELECT id, email FROM users WHERE email = ?1",
                params![email.as_str()],
                user_from_row,
            )
            .optional()
            .map_err(storage_error)?;
        match row {
            Some(row) => into_domain(row),
            None => Err(RepositoryError::UserNotFound(email.as_str().to_string())),
        }
    }

    async fn create(&self, user: User) -> Result<User, RepositoryError> {
        let conn = self.conn.lock().await;
        let result = conn.execute(
            "INSERT INTO users (id, email) VALUES (?1, ?2)",
            params![user.id.as_str(), user.email.as_str()],
        );
        match result {
            Ok(_) => Ok(user),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == ErrorCode::ConstraintViolation =>
            {
                Err(RepositoryError::UserConflict(user.id.as_str().to_string()))
            }
            Err(e) => Err(storage_error(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::repository::sqlite::SqliteStore;

    fn user(id: &str, email: &str) -> User {
        User::new(
            UserId::new(id.to_string()).unwrap(),
            Email::new(email.to_string()).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_create_and_find() {
        // テスト項目: 作成したユーザーが ID と email の両方で引ける
        // given (前提条件):
        let store = SqliteStore::open_in_memory().unwrap();
        let repo = store.user_repository();
        let alice = user("u1", "alice@example.com");

        // when (操作):
        repo.create(alice.clone()).await.unwrap();

        // then (期待する結果):
        assert_eq!(repo.find_by_id(&alice.id).await.unwrap(), alice);
        assert_eq!(repo.find_by_email(&alice.email).await.unwrap(), alice);
    }

    #[tokio::test]
    async fn test_create_duplicate_id_conflicts() {
        // テスト項目: 既存 ID での作成は UserConflict になる
        // given (前提条件):
        let store = SqliteStore::open_in_memory().unwrap();
        let repo = store.user_repository();
        repo.create(user("u1", "alice@example.com")).await.unwrap();

        // when (操作): 同じ ID で別 email
        let result = repo.create(user("u1", "other@example.com")).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RepositoryError::UserConflict("u1".to_string()))
        );
    }

    #[tokio::test]
    async fn test_create_duplicate_email_conflicts() {
        // テスト項目: 既存 email での作成は UserConflict になる（UNIQUE 制約）
        // given (前提条件):
        let store = SqliteStore::open_in_memory().unwrap();
        let repo = store.user_repository();
        repo.create(user("u1", "alice@example.com")).await.unwrap();

        // when (操作): 別 ID で同じ email
        let result = repo.create(user("u2", "alice@example.com")).await;

        // then (期待する結果):
        assert!(matches!(result, Err(RepositoryError::UserConflict(_))));
    }

    #[tokio::test]
    async fn test_find_missing_user_errors() {
        // テスト項目: 存在しないユーザーは UserNotFound になる
        // given (前提条件):
        let store = SqliteStore::open_in_memory().unwrap();
        let repo = store.user_repository();

        // when (操作):
        let result = repo
            .find_by_email(&Email::new("ghost@example.com".to_string()).unwrap())
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RepositoryError::UserNotFound(
                "ghost@example.com".to_string()
            ))
        );
    }
}
