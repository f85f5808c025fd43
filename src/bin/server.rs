//! Real-time group chat server: REST API plus WebSocket gateway.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin server
//! cargo run --bin server -- --host 0.0.0.0 --port 3000 --db-path chat.db3
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::sync::Mutex;

use zatsudan::{
    common::{logger::setup_logger, time::SystemClock},
    domain::{MessageRepository, Roster, UserRepository},
    infrastructure::{
        pusher::WebSocketEventPusher,
        repository::{InMemoryMessageRepository, InMemoryUserRepository, SqliteStore},
    },
    ui::Server,
    usecase::{
        DisconnectClientUseCase, MessageService, PostMessageUseCase, RegisterClientUseCase,
        ToggleLikeUseCase,
    },
};

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Real-time group chat server (REST + WebSocket)", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// SQLite database file; omit to keep messages in memory only
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Shared token for PATCH/DELETE; omit to lock mutation endpoints
    #[arg(long)]
    api_token: Option<String>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repositories (SQLite or in-memory)
    // 2. Roster + EventPusher
    // 3. UseCases
    // 4. Server

    // 1. Create Repositories
    let (messages, users): (Arc<dyn MessageRepository>, Arc<dyn UserRepository>) =
        match &args.db_path {
            Some(path) => {
                let store = match SqliteStore::open(path) {
                    Ok(store) => store,
                    Err(e) => {
                        tracing::error!("Failed to open database at {}: {}", path.display(), e);
                        std::process::exit(1);
                    }
                };
                tracing::info!("Messages stored in SQLite at {}", path.display());
                (
                    Arc::new(store.message_repository()),
                    Arc::new(store.user_repository()),
                )
            }
            None => {
                tracing::info!("No --db-path given, messages are stored in memory");
                (
                    Arc::new(InMemoryMessageRepository::new()),
                    Arc::new(InMemoryUserRepository::new()),
                )
            }
        };

    // 2. Create Roster and EventPusher (WebSocket implementation)
    let clock = Arc::new(SystemClock);
    let roster = Arc::new(Mutex::new(Roster::new()));
    let event_pusher = Arc::new(WebSocketEventPusher::new());

    // 3. Create UseCases
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

    // 4. Create and run the server
    let server = Server::new(
        message_service,
        register_client_usecase,
        disconnect_client_usecase,
        post_message_usecase,
        toggle_like_usecase,
        roster,
        event_pusher,
        args.api_token,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
