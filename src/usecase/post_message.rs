//! UseCase: メッセージ投稿処理（messageFromClient）
//!
//! ## 入力テキストの3分類
//!
//! 1. リフレッシュ信号（空文字 or `"newMessage"`）— フィード再取得の合図。
//!    そのまま全員に再配信するだけで、ストアには決して入れない。
//! 2. 登録済みセッションの本文 — **persist-then-broadcast**。先にストアへ
//!    入れ、受理された行（確定 ID・確定タイムスタンプ）だけを配信する。
//!    保存に失敗したら接続元にエラーを返し、何も配信しない。どこにも
//!    「存在しないメッセージ」が残らない。
//! 3. 未登録セッションの本文 — その場限りの配信のみ（匿名・ID なし・
//!    保存なし）。

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::common::time::Clock;
use crate::domain::{Message, MessageText, Roster, SessionId, Timestamp, User, is_refresh_signal};

use super::error::PostMessageError;
use super::message_service::MessageService;

/// 投稿の分類結果
///
/// 配信ペイロードの組み立てはハンドラ側（DTO 層）の仕事。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostOutcome {
    /// リフレッシュ信号の再配信（保存なし）
    Refresh { text: String },
    /// ストアが受理した行の配信
    Persisted(Message),
    /// 匿名セッションのその場限りの配信（保存なし）
    Ephemeral {
        text: MessageText,
        created_at: Timestamp,
    },
}

/// メッセージ投稿のユースケース
pub struct PostMessageUseCase {
    /// メッセージサービス（永続化経路）
    message_service: Arc<MessageService>,
    /// 在席ロースター（送信者解決に使用）
    roster: Arc<Mutex<Roster>>,
    /// 時刻取得の抽象化（匿名配信のタイムスタンプ用）
    clock: Arc<dyn Clock>,
}

impl PostMessageUseCase {
    /// 新しい PostMessageUseCase を作成
    pub fn new(
        message_service: Arc<MessageService>,
        roster: Arc<Mutex<Roster>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            message_service,
            roster,
            clock,
        }
    }

    /// メッセージ投稿を実行
    ///
    /// # Arguments
    ///
    /// * `session_id` - 送信元のセッション ID
    /// * `raw_text` - クライアントから届いた生テキスト
    ///
    /// # Returns
    ///
    /// * `Ok(PostOutcome)` - 配信すべき内容の分類
    /// * `Err(PostMessageError)` - バリデーション失敗・保存失敗（接続元にのみ通知）
    pub async fn execute(
        &self,
        session_id: &SessionId,
        raw_text: String,
    ) -> Result<PostOutcome, PostMessageError> {
        // 1. リフレッシュ信号はストアに触れず素通しする
        if is_refresh_signal(&raw_text) {
            return Ok(PostOutcome::Refresh { text: raw_text });
        }

        // 2. ロースターから送信者を解決
        let sender = self.resolve_sender(session_id).await;

        match sender {
            // 3a. 登録済み: 先に保存し、受理された行だけを配信対象にする
            Some(user) => {
                let message = self
                    .message_service
                    .create_authored(raw_text, &user.id)
                    .await?;
                Ok(PostOutcome::Persisted(message))
            }
            // 3b. 未登録: その場限りの配信（保存なし)
            None => {
                let text = MessageText::new(raw_text)?;
                Ok(PostOutcome::Ephemeral {
                    text,
                    created_at: Timestamp::new(self.clock.now_millis()),
                })
            }
        }
    }

    async fn resolve_sender(&self, session_id: &SessionId) -> Option<User> {
        let roster = self.roster.lock().await;
        roster.user_for_session(session_id).cloned()
    }
}
