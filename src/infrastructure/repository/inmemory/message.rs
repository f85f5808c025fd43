//! InMemory Message Repository 実装
//!
//! ドメイン層が定義する MessageRepository trait のインメモリ実装。
//! `--db-path` なしで起動したサーバーと単体テストが使う。
//! 挿入順を保持する Vec をストレージにしているので、同時刻のメッセージも
//! フィードで安定した順序になる。

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Message, MessageId, MessageRepository, MessageText, RepositoryError, Timestamp, UserId,
};

/// インメモリ Message Repository 実装
pub struct InMemoryMessageRepository {
    /// 挿入順のメッセージ列（論理削除済みも行として残る）
    messages: Mutex<Vec<Message>>,
}

impl InMemoryMessageRepository {
    /// 新しい InMemoryMessageRepository を作成
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryMessageRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn create(&self, message: Message) -> Result<Message, RepositoryError> {
        let mut messages = self.messages.lock().await;
        messages.push(message.clone());
        Ok(message)
    }

    async fn find_all(&self) -> Result<Vec<Message>, RepositoryError> {
        let messages = self.messages.lock().await;
        let mut feed: Vec<Message> = messages
            .iter()
            .filter(|m| !m.is_deleted())
            .cloned()
            .collect();
        // 安定ソートなので同時刻は挿入順のまま
        feed.sort_by_key(|m| m.created_at);
        Ok(feed)
    }

    async fn find_by_id(&self, id: &MessageId) -> Result<Message, RepositoryError> {
        let messages = self.messages.lock().await;
        messages
            .iter()
            .find(|m| &m.id == id && !m.is_deleted())
            .cloned()
            .ok_or_else(|| RepositoryError::MessageNotFound(id.as_str().to_string()))
    }

    async fn update_text(
        &self,
        id: &MessageId,
        text: MessageText,
        updated_at: Timestamp,
    ) -> Result<Message, RepositoryError> {
        let mut messages = self.messages.lock().await;
        let message = messages
            .iter_mut()
            .find(|m| &m.id == id && !m.is_deleted())
            .ok_or_else(|| RepositoryError::MessageNotFound(id.as_str().to_string()))?;
        message.text = text;
        message.updated_at = updated_at;
        Ok(message.clone())
    }

    async fn soft_delete(
        &self,
        id: &MessageId,
        deleted_at: Timestamp,
    ) -> Result<Message, RepositoryError> {
        let mut messages = self.messages.lock().await;
        let message = messages
            .iter_mut()
            .find(|m| &m.id == id && !m.is_deleted())
            .ok_or_else(|| RepositoryError::MessageNotFound(id.as_str().to_string()))?;
        message.deleted_at = Some(deleted_at);
        message.updated_at = deleted_at;
        Ok(message.clone())
    }

    async fn hard_delete(&self, id: &MessageId) -> Result<(), RepositoryError> {
        let mut messages = self.messages.lock().await;
        let position = messages
            .iter()
            .position(|m| &m.id == id)
            .ok_or_else(|| RepositoryError::MessageNotFound(id.as_str().to_string()))?;
        messages.remove(position);
        Ok(())
    }

    async fn toggle_like(
        &self,
        id: &MessageId,
        user_id: &UserId,
        updated_at: Timestamp,
    ) -> Result<Message, RepositoryError> {
        // 読み取り・反転・書き込みを同一ロック区間で行う
        let mut messages = self.messages.lock().await;
        let message = messages
            .iter_mut()
            .find(|m| &m.id == id && !m.is_deleted())
            .ok_or_else(|| RepositoryError::MessageNotFound(id.as_str().to_string()))?;
        message.toggle_like(user_id);
        message.updated_at = updated_at;
        Ok(message.clone())
    }
}
