//! In-process test server fixture.
//!
//! Boots the full app (in-memory store) on an OS-assigned port so tests stay
//! hermetic and never race over hard-coded port numbers.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::Mutex;

use zatsudan::{
    common::time::SystemClock,
    domain::Roster,
    infrastructure::{
        pusher::WebSocketEventPusher,
        repository::{InMemoryMessageRepository, InMemoryUserRepository},
    },
    ui::Server,
    usecase::{
        DisconnectClientUseCase, MessageService, PostMessageUseCase, RegisterClientUseCase,
        ToggleLikeUseCase,
    },
};

pub struct TestServer {
    addr: SocketAddr,
}

impl TestServer {
    /// Start the app with the given bearer token for PATCH/DELETE.
    pub async fn start(api_token: Option<&str>) -> Self {
        let messages = Arc::new(InMemoryMessageRepository::new());
        let users = Arc::new(InMemoryUserRepository::new());
        let clock = Arc::new(SystemClock);
        let roster = Arc::new(Mutex::new(Roster::new()));
        let event_pusher = Arc::new(WebSocketEventPusher::new());

        let message_service = Arc::new(MessageService::new(
            messages,
            users.clone(),
            clock.clone(),
        ));
        let register_client_usecase = Arc::new(RegisterClientUseCase::new(
            users,
            roster.clone(),
            clock.clone(),
        ));
        let disconnect_client_usecase =
            Arc::new(DisconnectClientUseCase::new(roster.clone(), clock.clone()));
        let post_message_usecase = Arc::new(PostMessageUseCase::new(
            message_service.clone(),
            roster.clone(),
            clock,
        ));
        let toggle_like_usecase = Arc::new(ToggleLikeUseCase::new(
            message_service.clone(),
            roster.clone(),
        ));

        let server = Server::new(
            message_service,
            register_client_usecase,
            disconnect_client_usecase,
            post_message_usecase,
            toggle_like_usecase,
            roster,
            event_pusher,
            api_token.map(str::to_string),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read listener addr");

        tokio::spawn(async move {
            axum::serve(listener, server.router())
                .await
                .expect("Test server exited");
        });

        TestServer { addr }
    }

    /// Base URL for REST requests
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// URL of the WebSocket endpoint
    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }
}
