//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::{
    entity::{Message, User},
    error::RepositoryError,
    value_object::{Email, MessageId, MessageText, Timestamp, UserId},
};

/// Message Repository trait
///
/// メッセージストアへのインターフェース。
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
///
/// ## 依存性の逆転（DIP）
///
/// - ドメイン層が必要とするインターフェースをドメイン層自身が定義
/// - Infrastructure 層がドメイン層のインターフェースに依存
/// - ドメイン層は Infrastructure 層に依存しない
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// メッセージを永続化し、保存された行を返す
    async fn create(&self, message: Message) -> Result<Message, RepositoryError>;

    /// フィードを取得（作成時刻の昇順、同時刻は挿入順。論理削除済みは除外）
    async fn find_all(&self) -> Result<Vec<Message>, RepositoryError>;

    /// ID でメッセージを取得（論理削除済みは NotFound 扱い）
    async fn find_by_id(&self, id: &MessageId) -> Result<Message, RepositoryError>;

    /// メッセージ本文を更新し、更新後の行を返す
    async fn update_text(
        &self,
        id: &MessageId,
        text: MessageText,
        updated_at: Timestamp,
    ) -> Result<Message, RepositoryError>;

    /// メッセージを論理削除し、マーク済みの行を返す
    async fn soft_delete(
        &self,
        id: &MessageId,
        deleted_at: Timestamp,
    ) -> Result<Message, RepositoryError>;

    /// メッセージを物理削除する
    async fn hard_delete(&self, id: &MessageId) -> Result<(), RepositoryError>;

    /// いいねをトグルし、更新後の行を返す。
    /// 読み取りと書き込みは単一のクリティカルセクションで行うこと。
    async fn toggle_like(
        &self,
        id: &MessageId,
        user_id: &UserId,
        updated_at: Timestamp,
    ) -> Result<Message, RepositoryError>;
}

/// User Repository trait
///
/// ユーザーストアへのインターフェース。
/// email はストア内で一意（1 email = 1 ユーザー行）。
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// ID でユーザーを取得
    async fn find_by_id(&self, id: &UserId) -> Result<User, RepositoryError>;

    /// email でユーザーを取得
    async fn find_by_email(&self, email: &Email) -> Result<User, RepositoryError>;

    /// ユーザーを永続化する。ID または email が衝突する場合は UserConflict
    async fn create(&self, user: User) -> Result<User, RepositoryError>;
}
