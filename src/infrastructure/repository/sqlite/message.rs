//! SQLite Message Repository 実装
//!
//! `messages` テーブルと `users` テーブルの LEFT JOIN で著者を一緒に引く。
//! `liked_by` カラムは simple-array 形式（カンマ結合 TEXT）で持ち、
//! ドメインの `Vec<UserId>` と相互変換する。いいねトグルはトランザクション
//! 内で select → 反転 → update を行う。

use std::sync::Arc;

use rusqlite::{Connection, OptionalExtension, params};
use tokio::sync::Mutex;

use crate::domain::{
    Email, Message, MessageId, MessageRepository, MessageText, RepositoryError, Timestamp, User,
    UserId,
};

use super::storage_error;

const SELECT_MESSAGE: &str = "
SELECT m.id, m.text, m.user_id, u.email AS user_email,
       m.likes, m.liked_by, m.created_at, m.updated_at, m.deleted_at
FROM messages m
LEFT JOIN users u ON u.id = m.user_id
";

/// SQLite Message Repository 実装
pub struct SqliteMessageRepository {
    /// 共有コネクション（SqliteStore が所有）
    conn: Arc<Mutex<Connection>>,
}

impl SqliteMessageRepository {
    /// 新しい SqliteMessageRepository を作成
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }
}

/// `liked_by` カラムの1行分（カンマ結合）をドメインのリストへ
fn decode_liked_by(column: &str) -> Result<Vec<UserId>, RepositoryError> {
    column
        .split(',')
        .filter(|s| !s.is_empty())
        .map(|s| {
            UserId::new(s.to_string())
                .map_err(|e| RepositoryError::Storage(format!("corrupt liked_by column: {e}")))
        })
        .collect()
}

/// ドメインのリストを `liked_by` カラムへ（UserId は `,` を含まない）
fn encode_liked_by(liked_by: &[UserId]) -> String {
    liked_by
        .iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// SELECT_MESSAGE の1行分。`FromRow` 相当の薄い写像で、ドメイン変換は
/// `into_domain` で行う（カラム順に依存せず名前で取る）。
struct MessageRow {
    id: String,
    text: String,
    user_id: Option<String>,
    user_email: Option<String>,
    likes: i64,
    liked_by: String,
    created_at: i64,
    updated_at: i64,
    deleted_at: Option<i64>,
}

impl MessageRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            text: row.get("text")?,
            user_id: row.get("user_id")?,
            user_email: row.get("user_email")?,
            likes: row.get("likes")?,
            liked_by: row.get("liked_by")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
            deleted_at: row.get("deleted_at")?,
        })
    }

    fn into_domain(self) -> Result<Message, RepositoryError> {
        let corrupt =
            |e: crate::domain::ValueObjectError| RepositoryError::Storage(format!("corrupt row: {e}"));
        let author = match (self.user_id, self.user_email) {
            (Some(id), Some(email)) => Some(User::new(
                UserId::new(id).map_err(corrupt)?,
                Email::new(email).map_err(corrupt)?,
            )),
            _ => None,
        };
        Ok(Message {
            id: MessageId::new(self.id).map_err(corrupt)?,
            text: MessageText::new(self.text).map_err(corrupt)?,
            author,
            likes: self.likes,
            liked_by: decode_liked_by(&self.liked_by)?,
            created_at: Timestamp::new(self.created_at),
            updated_at: Timestamp::new(self.updated_at),
            deleted_at: self.deleted_at.map(Timestamp::new),
        })
    }
}

/// ID で1行引く。`include_deleted` は論理削除済みの行を返すかどうか
/// （soft_delete 直後の読み戻しにだけ true を使う）。
fn select_by_id(
    conn: &Connection,
    id: &MessageId,
    include_deleted: bool,
) -> Result<Message, RepositoryError> {
    let sql = if include_deleted {
        format!("{SELECT_MESSAGE} WHERE m.id = ?1")
    } else {
        format!("{SELECT_MESSAGE} WHERE m.id = ?1 AND m.deleted_at IS NULL")
    };
    let row = conn
        .query_row(&sql, params![id.as_str()], MessageRow::from_row)
        .optional()
        .map_err(storage_error)?;
    match row {
        Some(row) => row.into_domain(),
        None => Err(RepositoryError::MessageNotFound(id.as_str().to_string())),
    }
}

#[async_trait::async_trait]
impl MessageRepository for SqliteMessageRepository {
    async fn create(&self, message: Message) -> Result<Message, RepositoryError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO messages (id, text, user_id, likes, liked_by, created_at, updated_at, deleted_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                message.id.as_str(),
                message.text.as_str(),
                message.author.as_ref().map(|u| u.id.as_str()),
                message.likes,
                encode_liked_by(&message.liked_by),
                message.created_at.value(),
                message.updated_at.value(),
                message.deleted_at.map(|ts| ts.value()),
            ],
        )
        .map_err(storage_error)?;
        Ok(message)
    }

    async fn find_all(&self) -> Result<Vec<Message>, RepositoryError> {
        let conn = self.conn.lock().await;
        // rowid の副キーで同時刻の行を挿入順に保つ
        let sql = format!(
            "{SELECT_MESSAGE} WHERE m.deleted_at IS NULL ORDER BY m.created_at ASC, m.rowid ASC"
        );
        let mut stmt = conn.prepare(&sql).map_err(storage_error)?;
        let rows = stmt
            .query_map([], MessageRow::from_row)
            .map_err(storage_error)?;
        let mut feed = Vec::new();
        for row in rows {
            feed.push(row.map_err(storage_error)?.into_domain()?);
        }
        Ok(feed)
    }

    async fn find_by_id(&self, id: &MessageId) -> Result<Message, RepositoryError> {
        let conn = self.conn.lock().await;
        select_by_id(&conn, id, false)
    }

    async fn update_text(
        &self,
        id: &MessageId,
        text: MessageText,
        updated_at: Timestamp,
    ) -> Result<Message, RepositoryError> {
        let conn = self.conn.lock().await;
        let affected = conn
            .execute(
                "UPDATE messages SET text = ?1, updated_at = ?2 WHERE id = ?3 AND deleted_at IS NULL",
                params![text.as_str(), updated_at.value(), id.as_str()],
            )
            .map_err(storage_error)?;
        if affected == 0 {
            return Err(RepositoryError::MessageNotFound(id.as_str().to_string()));
        }
        select_by_id(&conn, id, false)
    }

    async fn soft_delete(
        &self,
        id: &MessageId,
        deleted_at: Timestamp,
    ) -> Result<Message, RepositoryError> {
        let conn = self.conn.lock().await;
        let affected = conn
            .execute(
                "UPDATE messages SET deleted_at = ?1, updated_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
                params![deleted_at.value(), id.as_str()],
            )
            .map_err(storage_error)?;
        if affected == 0 {
            return Err(RepositoryError::MessageNotFound(id.as_str().to_string()));
        }
        select_by_id(&conn, id, true)
    }

    async fn hard_delete(&self, id: &MessageId) -> Result<(), RepositoryError> {
        let conn = self.conn.lock().await;
        let affected = conn
            .execute("DELETE FROM messages WHERE id = ?1", params![id.as_str()])
            .map_err(storage_error)?;
        if affected == 0 {
            return Err(RepositoryError::MessageNotFound(id.as_str().to_string()));
        }
        Ok(())
    }

    async fn toggle_like(
        &self,
        id: &MessageId,
        user_id: &UserId,
        updated_at: Timestamp,
    ) -> Result<Message, RepositoryError> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction().map_err(storage_error)?;

        let mut message = select_by_id(&tx, id, false)?;
        message.toggle_like(user_id);
        message.updated_at = updated_at;

        tx.execute(
            "UPDATE messages SET likes = ?1, liked_by = ?2, updated_at = ?3 WHERE id = ?4",
            params![
                message.likes,
                encode_liked_by(&message.liked_by),
                updated_at.value(),
                id.as_str()
            ],
        )
        .map_err(storage_error)?;
        tx.commit().map_err(storage_error)?;

        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessageIdFactory, UserRepository};
    use crate::infrastructure::repository::sqlite::SqliteStore;

    fn message(text: &str, author: Option<User>, created_at: i64) -> Message {
        Message::new(
            MessageIdFactory::generate(),
            MessageText::new(text.to_string()).unwrap(),
            author,
            Timestamp::new(created_at),
        )
    }

    fn user(id: &str, email: &str) -> User {
        User::new(
            UserId::new(id.to_string()).unwrap(),
            Email::new(email.to_string()).unwrap(),
        )
    }

    #[test]
    fn test_liked_by_column_round_trip() {
        // テスト項目: liked_by カラムのエンコード・デコードが元のリストに戻る
        // given (前提条件):
        let ids = vec![
            UserId::new("u1".to_string()).unwrap(),
            UserId::new("u2".to_string()).unwrap(),
        ];

        // when (操作):
        let column = encode_liked_by(&ids);
        let decoded = decode_liked_by(&column).unwrap();

        // then (期待する結果):
        assert_eq!(column, "u1,u2");
        assert_eq!(decoded, ids);
        assert!(decode_liked_by("").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_and_find_with_author() {
        // テスト項目: 著者付きメッセージが JOIN 込みで読み戻せる
        // given (前提条件): alice のユーザー行を先に作る
        let store = SqliteStore::open_in_memory().unwrap();
        let users = store.user_repository();
        let repo = store.message_repository();
        let alice = user("u1", "alice@example.com");
        users.create(alice.clone()).await.unwrap();

        // when (操作):
        let stored = repo
            .create(message("Hello!", Some(alice.clone()), 1000))
            .await
            .unwrap();
        let found = repo.find_by_id(&stored.id).await.unwrap();

        // then (期待する結果):
        assert_eq!(found, stored);
        assert_eq!(found.author, Some(alice));
    }

    #[tokio::test]
    async fn test_find_all_sorted_with_stable_tiebreak() {
        // テスト項目: フィードが作成時刻の昇順、同時刻は挿入順（rowid 順）になる
        // given (前提条件): b と c は同時刻
        let store = SqliteStore::open_in_memory().unwrap();
        let repo = store.message_repository();
        repo.create(message("a", None, 3000)).await.unwrap();
        repo.create(message("b", None, 1000)).await.unwrap();
        repo.create(message("c", None, 1000)).await.unwrap();

        // when (操作):
        let feed = repo.find_all().await.unwrap();

        // then (期待する結果):
        let texts: Vec<&str> = feed.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["b", "c", "a"]);
    }

    #[tokio::test]
    async fn test_soft_deleted_rows_are_invisible() {
        // テスト項目: 論理削除した行はフィードと find_by_id から消えるが行自体は残る
        // given (前提条件):
        let store = SqliteStore::open_in_memory().unwrap();
        let repo = store.message_repository();
        let stored = repo.create(message("bye", None, 1000)).await.unwrap();

        // when (操作):
        let marked = repo
            .soft_delete(&stored.id, Timestamp::new(2000))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(marked.deleted_at, Some(Timestamp::new(2000)));
        assert!(repo.find_all().await.unwrap().is_empty());
        assert!(matches!(
            repo.find_by_id(&stored.id).await,
            Err(RepositoryError::MessageNotFound(_))
        ));

        // 物理削除はまだできる（行は残っている）
        assert!(repo.hard_delete(&stored.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_text_not_found() {
        // テスト項目: 存在しない行の本文更新は MessageNotFound になる
        // given (前提条件):
        let store = SqliteStore::open_in_memory().unwrap();
        let repo = store.message_repository();
        let ghost = MessageIdFactory::generate();

        // when (操作):
        let result = repo
            .update_text(
                &ghost,
                MessageText::new("text".to_string()).unwrap(),
                Timestamp::new(1000),
            )
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RepositoryError::MessageNotFound(
                ghost.as_str().to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_toggle_like_twice_restores_state() {
        // テスト項目: 2回トグルすると likes=0, liked_by=[] に戻る
        // given (前提条件):
        let store = SqliteStore::open_in_memory().unwrap();
        let repo = store.message_repository();
        let stored = repo.create(message("m1", None, 1000)).await.unwrap();
        let u1 = UserId::new("u1".to_string()).unwrap();

        // when (操作): 1回目のトグル
        let first = repo
            .toggle_like(&stored.id, &u1, Timestamp::new(2000))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(first.likes, 1);
        assert_eq!(first.liked_by, vec![u1.clone()]);

        // when (操作): 2回目のトグル
        let second = repo
            .toggle_like(&stored.id, &u1, Timestamp::new(3000))
            .await
            .unwrap();

        // then (期待する結果): 元に戻り、ストアの行も一致する
        assert_eq!(second.likes, 0);
        assert!(second.liked_by.is_empty());
        let reread = repo.find_by_id(&stored.id).await.unwrap();
        assert_eq!(reread.likes, 0);
        assert!(reread.liked_by.is_empty());
    }

    #[tokio::test]
    async fn test_toggle_like_concurrent_users() {
        // テスト項目: 並行トグルでもカウントとリストがずれない
        // given (前提条件): 10人のユーザーが同じメッセージを同時にトグルする
        let store = SqliteStore::open_in_memory().unwrap();
        let repo = std::sync::Arc::new(store.message_repository());
        let stored = repo.create(message("m1", None, 1000)).await.unwrap();

        // when (操作):
        let mut handles = Vec::new();
        for i in 0..10 {
            let repo = repo.clone();
            let id = stored.id.clone();
            handles.push(tokio::spawn(async move {
                let user = UserId::new(format!("u{i}")).unwrap();
                repo.toggle_like(&id, &user, Timestamp::new(2000)).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        // then (期待する結果): 全員1回ずつなので likes=10、リストも10件
        let after = repo.find_by_id(&stored.id).await.unwrap();
        assert_eq!(after.likes, 10);
        assert_eq!(after.liked_by.len(), 10);
    }
}
