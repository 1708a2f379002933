//! Real-time group messaging coordinator.
//!
//! Tracks group membership and typing state, fans messages out to live
//! connections and appends them to a durable log.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tamariba-server -- --auth-secret my-secret
//! cargo run --bin tamariba-server -- --host 0.0.0.0 --port 3000 --auth-secret my-secret
//! ```
//!
//! Mint a token for manual testing:
//! ```not_rust
//! cargo run --bin tamariba-server -- --auth-secret my-secret --mint-token u-alice
//! ```

use std::sync::Arc;

use clap::Parser;
use tokio::sync::Mutex;

use tamariba_server::{
    domain::{MembershipRegistry, TypingTracker},
    infrastructure::{
        auth::{HmacTokenVerifier, mint_token},
        event_pusher::WebSocketEventPusher,
        message_log::InMemoryMessageLog,
    },
    ui::Server,
    usecase::{
        DisconnectUseCase, GroupQueryUseCase, JoinGroupUseCase, SendMessageUseCase,
        SetTypingUseCase,
    },
};
use tamariba_shared::{logger::setup_logger, time::SystemClock};

/// Default lifetime of minted tokens (24 hours)
const MINTED_TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

#[derive(Parser, Debug)]
#[command(name = "tamariba-server")]
#[command(about = "Real-time group messaging coordinator", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Secret used to verify authentication tokens
    #[arg(long, env = "TAMARIBA_AUTH_SECRET")]
    auth_secret: String,

    /// Maximum number of stored messages per group
    #[arg(long, default_value = "1000")]
    log_capacity: usize,

    /// Print a token for the given user id and exit
    #[arg(long, value_name = "USER_ID")]
    mint_token: Option<String>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_PKG_NAME"), env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    if let Some(user_id) = args.mint_token {
        println!(
            "{}",
            mint_token(&user_id, &args.auth_secret, MINTED_TOKEN_TTL_SECS)
        );
        return;
    }

    // Initialize dependencies in order:
    // 1. Shared in-memory state
    // 2. Collaborators (MessageLog, EventPusher, TokenVerifier, Clock)
    // 3. UseCases
    // 4. Server

    // 1. Create shared in-memory state
    let registry = Arc::new(Mutex::new(MembershipRegistry::new()));
    let typing = Arc::new(Mutex::new(TypingTracker::new()));

    // 2. Create collaborators
    let log = Arc::new(InMemoryMessageLog::with_capacity(args.log_capacity));
    let pusher = Arc::new(WebSocketEventPusher::new());
    let verifier = Arc::new(HmacTokenVerifier::new(args.auth_secret));
    let clock = Arc::new(SystemClock);

    // 3. Create UseCases
    let join_group_usecase = Arc::new(JoinGroupUseCase::new(registry.clone(), pusher.clone()));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(
        registry.clone(),
        log.clone(),
        pusher.clone(),
        clock,
    ));
    let set_typing_usecase = Arc::new(SetTypingUseCase::new(
        registry.clone(),
        typing.clone(),
        pusher.clone(),
    ));
    let disconnect_usecase = Arc::new(DisconnectUseCase::new(
        registry.clone(),
        typing.clone(),
        pusher.clone(),
    ));
    let group_query_usecase = Arc::new(GroupQueryUseCase::new(registry, typing, log));

    // 4. Create and run the server
    let server = Server::new(
        join_group_usecase,
        send_message_usecase,
        set_typing_usecase,
        disconnect_usecase,
        group_query_usecase,
        pusher,
        verifier,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
