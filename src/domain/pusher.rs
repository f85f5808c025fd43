//! EventPusher trait 定義
//!
//! ドメイン層が必要とするイベント配信のインターフェースを定義します。
//! WebSocket などの具体的な配信手段は Infrastructure 層が提供します。

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;

use super::{error::EventPushError, value_object::SessionId};

/// セッションへイベントを流し込むチャンネル
///
/// UI 層が WebSocket 接続ごとに生成し、EventPusher に登録します。
pub type PusherChannel = UnboundedSender<String>;

/// Event Pusher trait
///
/// 接続中セッションへのイベント配信の抽象。
/// UseCase 層はこの trait に依存し、WebSocket 実装の詳細には依存しない。
#[async_trait]
pub trait EventPusher: Send + Sync {
    /// セッションのチャンネルを登録
    async fn register_session(&self, session_id: SessionId, sender: PusherChannel);

    /// セッションのチャンネルを解除
    async fn unregister_session(&self, session_id: &SessionId);

    /// 特定のセッションにイベントを送信（接続元限定イベント用）
    async fn push_to(&self, session_id: &SessionId, payload: &str)
    -> Result<(), EventPushError>;

    /// 登録中の全セッションにイベントを送信（送信元を含む）。
    /// 一部セッションへの送信失敗は許容する。
    async fn broadcast_all(&self, payload: &str) -> Result<(), EventPushError>;
}
