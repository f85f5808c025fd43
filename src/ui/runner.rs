//! サーバ起動とルーティング

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use crate::domain::{EventPusher, Roster};
use crate::ui::handler::{
    create_message, debug_roster, delete_message, get_message, get_messages, health_check,
    update_message, websocket_handler,
};
use crate::ui::signal::shutdown_signal;
use crate::ui::state::AppState;
use crate::usecase::{
    DisconnectClientUseCase, MessageService, PostMessageUseCase, RegisterClientUseCase,
    ToggleLikeUseCase,
};

/// チャットサーバ本体。依存を束ねて axum アプリとして起動する。
pub struct Server {
    message_service: Arc<MessageService>,
    register_client_usecase: Arc<RegisterClientUseCase>,
    disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    post_message_usecase: Arc<PostMessageUseCase>,
    toggle_like_usecase: Arc<ToggleLikeUseCase>,
    roster: Arc<Mutex<Roster>>,
    event_pusher: Arc<dyn EventPusher>,
    api_token: Option<String>,
}

impl Server {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        message_service: Arc<MessageService>,
        register_client_usecase: Arc<RegisterClientUseCase>,
        disconnect_client_usecase: Arc<DisconnectClientUseCase>,
        post_message_usecase: Arc<PostMessageUseCase>,
        toggle_like_usecase: Arc<ToggleLikeUseCase>,
        roster: Arc<Mutex<Roster>>,
        event_pusher: Arc<dyn EventPusher>,
        api_token: Option<String>,
    ) -> Self {
        Self {
            message_service,
            register_client_usecase,
            disconnect_client_usecase,
            post_message_usecase,
            toggle_like_usecase,
            roster,
            event_pusher,
            api_token,
        }
    }

    /// ルーティングを組み立てる。テストからは任意のリスナーで serve できる。
    pub fn router(self) -> Router {
        let state = Arc::new(AppState {
            message_service: self.message_service,
            register_client_usecase: self.register_client_usecase,
            disconnect_client_usecase: self.disconnect_client_usecase,
            post_message_usecase: self.post_message_usecase,
            toggle_like_usecase: self.toggle_like_usecase,
            roster: self.roster,
            event_pusher: self.event_pusher,
            api_token: self.api_token,
        });

        Router::new()
            .route("/ws", get(websocket_handler))
            .route("/api/health", get(health_check))
            .route("/api/messages", post(create_message).get(get_messages))
            .route(
                "/api/messages/{message_id}",
                get(get_message)
                    .patch(update_message)
                    .delete(delete_message),
            )
            .route("/debug/roster", get(debug_roster))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// サーバを起動し、シャットダウンシグナルを受けるまで接続を受け付ける。
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();

        let bind_addr = format!("{host}:{port}");
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
        tracing::info!("Server running on {}", bind_addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}
