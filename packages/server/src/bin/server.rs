//! Tap Bridge server.
//!
//! Accepts WebSocket connections from browser clients, forwards every tap to
//! the downstream sound engine as a UDP datagram (`tap <id> <key>`) and
//! broadcasts it back to all clients.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tapbridge-server
//! PORT=8080 MAX_HOST=192.168.1.20 MAX_PORT=7400 cargo run --bin tapbridge-server
//! ```

use std::sync::Arc;

use clap::Parser;
use tapbridge_server::{
    config::Config,
    infrastructure::{
        forwarder::UdpTapForwarder, message_pusher::WebSocketMessagePusher,
        repository::InMemoryParticipantRepository,
    },
    ui::Server,
    usecase::{
        ConnectParticipantUseCase, DisconnectParticipantUseCase, RenameParticipantUseCase,
        SendTapUseCase,
    },
};
use tapbridge_shared::{logger::setup_logger, time::SystemClock};

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let config = Config::parse();

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. TapForwarder
    // 4. UseCases
    // 5. Server

    // 1. Create Repository (in-memory participant registry)
    let repository = Arc::new(InMemoryParticipantRepository::new());

    // 2. Create MessagePusher (WebSocket broadcast hub)
    let message_pusher = Arc::new(WebSocketMessagePusher::default());

    // 3. Create TapForwarder (UDP, destination fixed from here on)
    let forwarder = match UdpTapForwarder::connect(&config.max_host, config.max_port).await {
        Ok(forwarder) => forwarder,
        Err(e) => {
            tracing::error!(
                "Failed to set up UDP forwarding to {}:{}: {}",
                config.max_host,
                config.max_port,
                e
            );
            std::process::exit(1);
        }
    };
    tracing::info!("Forwarding taps over UDP to {}", forwarder.target_addr());
    let forwarder = Arc::new(forwarder);

    // 4. Create UseCases
    let connect_participant_usecase = Arc::new(ConnectParticipantUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let disconnect_participant_usecase = Arc::new(DisconnectParticipantUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let rename_participant_usecase = Arc::new(RenameParticipantUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let send_tap_usecase = Arc::new(SendTapUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        forwarder,
        Arc::new(SystemClock),
    ));

    // 5. Create and run the server
    let server = Server::new(
        connect_participant_usecase,
        disconnect_participant_usecase,
        rename_participant_usecase,
        send_tap_usecase,
    );
    if let Err(e) = server.run(&config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
