//! Server state shared across handlers

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{EventPusher, Roster};
use crate::usecase::{
    DisconnectClientUseCase, MessageService, PostMessageUseCase, RegisterClientUseCase,
    ToggleLikeUseCase,
};

/// Shared application state
pub struct AppState {
    /// メッセージ CRUD(REST ハンドラが使用)
    pub message_service: Arc<MessageService>,
    /// clientConnected イベントの処理
    pub register_client_usecase: Arc<RegisterClientUseCase>,
    /// セッション切断の処理
    pub disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    /// messageFromClient イベントの処理
    pub post_message_usecase: Arc<PostMessageUseCase>,
    /// toggleLike イベントの処理
    pub toggle_like_usecase: Arc<ToggleLikeUseCase>,
    /// 在席ロースター(デバッグ表示と著者の connected 解決に使用)
    pub roster: Arc<Mutex<Roster>>,
    /// セッションへのイベント配信
    pub event_pusher: Arc<dyn EventPusher>,
    /// PATCH / DELETE を許可する共有トークン(未設定なら常に 401)
    pub api_token: Option<String>,
}
