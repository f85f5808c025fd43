//! UseCase: いいねトグル処理（toggleLike）

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{Message, MessageId, Roster, SessionId, User};

use super::error::ToggleLikeError;
use super::message_service::MessageService;

/// いいねトグルのユースケース
///
/// 送信者はロースターで解決する。未登録セッションからのトグルは
/// `NotRegistered` で弾かれ、接続元にのみ `likeError` が返る。
/// カウントとリストの更新はストア側で不可分に行われるため、並行トグルで
/// 件数とリストがずれることはない。
pub struct ToggleLikeUseCase {
    /// メッセージサービス（トグル本体）
    message_service: Arc<MessageService>,
    /// 在席ロースター（送信者解決に使用）
    roster: Arc<Mutex<Roster>>,
}

impl ToggleLikeUseCase {
    /// 新しい ToggleLikeUseCase を作成
    pub fn new(message_service: Arc<MessageService>, roster: Arc<Mutex<Roster>>) -> Self {
        Self {
            message_service,
            roster,
        }
    }

    /// いいねトグルを実行
    ///
    /// # Returns
    ///
    /// * `Ok(Message)` - 更新後の行（messageLikeUpdate ブロードキャスト用）
    /// * `Err(ToggleLikeError)` - 未登録セッション・不正 ID・対象なし・ストア障害
    pub async fn execute(
        &self,
        session_id: &SessionId,
        raw_message_id: String,
    ) -> Result<Message, ToggleLikeError> {
        let message_id = MessageId::new(raw_message_id)?;

        let user = self
            .resolve_sender(session_id)
            .await
            .ok_or(ToggleLikeError::NotRegistered)?;

        Ok(self
            .message_service
            .toggle_like(&message_id, &user.id)
            .await?)
    }

    async fn resolve_sender(&self, session_id: &SessionId) -> Option<User> {
        let roster = self.roster.lock().await;
        roster.user_for_session(session_id).cloned()
    }
}
