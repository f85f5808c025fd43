//! SQLite Repository 実装
//!
//! rusqlite（bundled）によるリレーショナルストア。単一の `Connection` を
//! `tokio::sync::Mutex` で包み、Message / User 両リポジトリで共有する。
//! ロック区間がそのままクリティカルセクションになるので、いいねトグルの
//! read-modify-write も割り込まれない。

use std::path::Path;
use std::sync::Arc;

use rusqlite::Connection;
use tokio::sync::Mutex;

use crate::domain::RepositoryError;

pub mod message;
pub mod user;

pub use message::SqliteMessageRepository;
pub use user::SqliteUserRepository;

/// スキーマ定義。起動時に冪等に適用する（マイグレーション機構は持たない）。
///
/// `liked_by` は simple-array 形式（カンマ結合 TEXT）。UserId が `,` を
/// 拒否するのでデリミタ衝突はない。
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id    TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS messages (
    id         TEXT PRIMARY KEY,
    text       TEXT NOT NULL,
    user_id    TEXT REFERENCES users(id),
    likes      INTEGER NOT NULL DEFAULT 0,
    liked_by   TEXT NOT NULL DEFAULT '',
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    deleted_at INTEGER
);

CREATE INDEX IF NOT EXISTS idx_messages_created_at ON messages (created_at);
";

/// 共有 SQLite コネクション
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// ファイルパスを開いてスキーマを適用する
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let conn = Connection::open(path).map_err(storage_error)?;
        Self::init(conn)
    }

    /// インメモリ SQLite（テスト用）
    pub fn open_in_memory() -> Result<Self, RepositoryError> {
        let conn = Connection::open_in_memory().map_err(storage_error)?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, RepositoryError> {
        conn.execute_batch(SCHEMA).map_err(storage_error)?;
        tracing::info!("SQLite schema initialized");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// このストアを使う Message Repository を作る
    pub fn message_repository(&self) -> SqliteMessageRepository {
        SqliteMessageRepository::new(self.conn.clone())
    }

    /// このストアを使う User Repository を作る
    pub fn user_repository(&self) -> SqliteUserRepository {
        SqliteUserRepository::new(self.conn.clone())
    }
}

pub(crate) fn storage_error(e: rusqlite::Error) -> RepositoryError {
    RepositoryError::Storage(e.to_string())
}
