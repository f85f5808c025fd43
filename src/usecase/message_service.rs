//! UseCase: メッセージ CRUD + いいねトグル
//!
//! REST ハンドラと WebSocket ゲートウェイの両方から呼ばれる、
//! メッセージストアに対するビジネスロジックの集約点。

use std::sync::Arc;

use crate::common::time::Clock;
use crate::domain::{
    Email, Message, MessageId, MessageIdFactory, MessageRepository, MessageText, RepositoryError,
    Timestamp, User, UserId, UserRepository,
};

use super::error::MessageServiceError;

/// メッセージサービス
pub struct MessageService {
    /// メッセージストア（データアクセス層の抽象化）
    messages: Arc<dyn MessageRepository>,
    /// ユーザーストア（著者解決に使用）
    users: Arc<dyn UserRepository>,
    /// 時刻取得の抽象化（テストでは FixedClock）
    clock: Arc<dyn Clock>,
}

impl MessageService {
    /// 新しい MessageService を作成
    pub fn new(
        messages: Arc<dyn MessageRepository>,
        users: Arc<dyn UserRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            messages,
            users,
            clock,
        }
    }

    /// 登録済みユーザーのメッセージを永続化する（ゲートウェイの認証済み投稿経路）
    ///
    /// # Returns
    ///
    /// * `Ok(Message)` - ストアが受理した行（確定 ID・確定タイムスタンプ）
    /// * `Err(MessageServiceError)` - バリデーション失敗、ユーザー不在、ストア障害
    pub async fn create_authored(
        &self,
        text: String,
        user_id: &UserId,
    ) -> Result<Message, MessageServiceError> {
        let text = MessageText::new(text)?;

        // 著者はストアの行を正とする（ゲートウェイの申告値をそのまま信じない）
        let author = self.users.find_by_id(user_id).await?;

        let now = Timestamp::new(self.clock.now_millis());
        let message = Message::new(MessageIdFactory::generate(), text, Some(author), now);
        Ok(self.messages.create(message).await?)
    }

    /// REST 経由のメッセージ作成（認証なし、埋め込みユーザーは任意）
    ///
    /// 埋め込みユーザーの ID がストアに見つかればそのユーザーを著者にする。
    /// 見つからなければ警告を出して匿名メッセージとして保存する。
    pub async fn create(
        &self,
        text: String,
        embedded_user: Option<(UserId, Email)>,
    ) -> Result<Message, MessageServiceError> {
        let text = MessageText::new(text)?;

        let author = match embedded_user {
            Some((user_id, _email)) => match self.users.find_by_id(&user_id).await {
                Ok(user) => Some(user),
                Err(RepositoryError::UserNotFound(id)) => {
                    tracing::warn!("Unknown user '{}' on message create, storing as anonymous", id);
                    None
                }
                Err(e) => return Err(e.into()),
            },
            None => None,
        };

        let now = Timestamp::new(self.clock.now_millis());
        let message = Message::new(MessageIdFactory::generate(), text, author, now);
        Ok(self.messages.create(message).await?)
    }

    /// フィード全件を作成時刻の昇順で取得（論理削除済みは含まれない）
    pub async fn find_all(&self) -> Result<Vec<Message>, MessageServiceError> {
        Ok(self.messages.find_all().await?)
    }

    /// ID でメッセージを取得
    pub async fn find_one(&self, id: &MessageId) -> Result<Message, MessageServiceError> {
        Ok(self.messages.find_by_id(id).await?)
    }

    /// メッセージ本文を更新する
    pub async fn update(
        &self,
        id: &MessageId,
        text: String,
    ) -> Result<Message, MessageServiceError> {
        let text = MessageText::new(text)?;
        let now = Timestamp::new(self.clock.now_millis());
        Ok(self.messages.update_text(id, text, now).await?)
    }

    /// メッセージを論理削除する（行は残り、フィードから外れる）
    pub async fn soft_delete(&self, id: &MessageId) -> Result<Message, MessageServiceError> {
        let now = Timestamp::new(self.clock.now_millis());
        Ok(self.messages.soft_delete(id, now).await?)
    }

    /// メッセージを物理削除する
    pub async fn hard_delete(&self, id: &MessageId) -> Result<(), MessageServiceError> {
        Ok(self.messages.hard_delete(id).await?)
    }

    /// いいねをトグルする
    ///
    /// 挿入/削除とカウントの増減はストア側の単一クリティカルセクションで
    /// 行われる。同じユーザーが2回トグルすると元の状態に戻る。
    pub async fn toggle_like(
        &self,
        message_id: &MessageId,
        user_id: &UserId,
    ) -> Result<Message, MessageServiceError> {
        let now = Timestamp::new(self.clock.now_millis());
        Ok(self.messages.toggle_like(message_id, user_id, now).await?)
    }
}
