//! WebSocket を使った EventPusher 実装
//!
//! ## 責務
//!
//! - 接続中セッションの `UnboundedSender` を管理
//! - セッションへのイベント送信（push_to, broadcast_all）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`src/ui/handler/websocket.rs`）で行われます。
//! この実装は接続ごとに生成された sender を受け取って管理するだけで、
//! 「接続の受付」と「イベントの送信」を分離します。
//!
//! ブロードキャストは fire-and-forget：送達確認はなく、一部セッションへの
//! 送信失敗は警告ログだけ残して握りつぶす。チャンネルはプロセス終了か
//! セッション切断まで生きる。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{EventPushError, EventPusher, PusherChannel, SessionId};

/// WebSocket を使った EventPusher 実装
///
/// Key: セッション ID の文字列表現
/// Value: そのセッションの socket 送信タスクへ流すチャンネル
pub struct WebSocketEventPusher {
    sessions: Arc<Mutex<HashMap<String, PusherChannel>>>,
}

impl WebSocketEventPusher {
    /// 新しい WebSocketEventPusher を作成
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// 登録中のセッション数（テスト・デバッグ用）
    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

impl Default for WebSocketEventPusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPusher for WebSocketEventPusher {
    async fn register_session(&self, session_id: SessionId, sender: PusherChannel) {
        let mut sessions = self.sessions.lock().await;
        sessions.insert(session_id.as_str().to_string(), sender);
        tracing::debug!("Session '{}' registered to EventPusher", session_id);
    }

    async fn unregister_session(&self, session_id: &SessionId) {
        let mut sessions = self.sessions.lock().await;
        sessions.remove(session_id.as_str());
        tracing::debug!("Session '{}' unregistered from EventPusher", session_id);
    }

    async fn push_to(
        &self,
        session_id: &SessionId,
        payload: &str,
    ) -> Result<(), EventPushError> {
        let sessions = self.sessions.lock().await;

        if let Some(sender) = sessions.get(session_id.as_str()) {
            sender
                .send(payload.to_string())
                .map_err(|e| EventPushError::PushFailed(e.to_string()))?;
            tracing::debug!("Pushed event to session '{}'", session_id);
            Ok(())
        } else {
            Err(EventPushError::SessionNotFound(
                session_id.as_str().to_string(),
            ))
        }
    }

    async fn broadcast_all(&self, payload: &str) -> Result<(), EventPushError> {
        let sessions = self.sessions.lock().await;

        for (session_id, sender) in sessions.iter() {
            // ブロードキャストでは一部の送信失敗を許容
            if let Err(e) = sender.send(payload.to_string()) {
                tracing::warn!("Failed to push event to session '{}': {}", session_id, e);
            } else {
                tracing::debug!("Broadcasted event to session '{}'", session_id);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SessionIdFactory;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定のセッションにイベントを送信できる
        // given (前提条件):
        let pusher = WebSocketEventPusher::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let session = SessionIdFactory::generate();
        pusher.register_session(session.clone(), tx).await;

        // when (操作):
        let result = pusher.push_to(&session, "Hello").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some("Hello".to_string()));
    }

    #[tokio::test]
    async fn test_push_to_unknown_session_errors() {
        // テスト項目: 未登録セッションへの送信は SessionNotFound になる
        // given (前提条件):
        let pusher = WebSocketEventPusher::new();

        // when (操作):
        let result = pusher.push_to(&SessionIdFactory::generate(), "Hello").await;

        // then (期待する結果):
        assert!(matches!(
            result.unwrap_err(),
            EventPushError::SessionNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_broadcast_all_reaches_every_session() {
        // テスト項目: ブロードキャストが登録中の全セッション（送信元含む）に届く
        // given (前提条件):
        let pusher = WebSocketEventPusher::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        pusher
            .register_session(SessionIdFactory::generate(), tx1)
            .await;
        pusher
            .register_session(SessionIdFactory::generate(), tx2)
            .await;

        // when (操作):
        let result = pusher.broadcast_all("event").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx1.recv().await, Some("event".to_string()));
        assert_eq!(rx2.recv().await, Some("event".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_all_tolerates_dead_receiver() {
        // テスト項目: 受信側が消えたセッションがいてもブロードキャストは成功する
        // given (前提条件): rx1 を drop しておく
        let pusher = WebSocketEventPusher::new();
        let (tx1, rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        drop(rx1);
        pusher
            .register_session(SessionIdFactory::generate(), tx1)
            .await;
        pusher
            .register_session(SessionIdFactory::generate(), tx2)
            .await;

        // when (操作):
        let result = pusher.broadcast_all("event").await;

        // then (期待する結果): 生きている側には届く
        assert!(result.is_ok());
        assert_eq!(rx2.recv().await, Some("event".to_string()));
    }

    #[tokio::test]
    async fn test_unregister_removes_session() {
        // テスト項目: 解除したセッションには push_to できなくなる
        // given (前提条件):
        let pusher = WebSocketEventPusher::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let session = SessionIdFactory::generate();
        pusher.register_session(session.clone(), tx).await;
        assert_eq!(pusher.session_count().await, 1);

        // when (操作):
        pusher.unregister_session(&session).await;

        // then (期待する結果):
        assert_eq!(pusher.session_count().await, 0);
        assert!(pusher.push_to(&session, "Hello").await.is_err());
    }
}
