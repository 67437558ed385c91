//! Server execution logic.

use std::sync::Arc;

use axum::Router;
use tokio::{net::TcpListener, sync::watch};
use tower_http::trace::TraceLayer;

use crate::{
    config::Config,
    usecase::{
        ConnectParticipantUseCase, DisconnectParticipantUseCase, RenameParticipantUseCase,
        SendTapUseCase,
    },
};

use super::{
    handler::{http::health_check, websocket::websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket tap relay server
///
/// This struct holds the use cases and serves them on a WebSocket listener,
/// next to a plain HTTP health-check listener.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     connect_participant_usecase,
///     disconnect_participant_usecase,
///     rename_participant_usecase,
///     send_tap_usecase,
/// );
/// server.run(&config).await?;
/// ```
pub struct Server {
    /// ConnectParticipantUseCase（参加者接続のユースケース）
    connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    /// DisconnectParticipantUseCase（参加者切断のユースケース）
    disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// RenameParticipantUseCase（参加者改名のユースケース）
    rename_participant_usecase: Arc<RenameParticipantUseCase>,
    /// SendTapUseCase（タップ送信のユースケース）
    send_tap_usecase: Arc<SendTapUseCase>,
}

impl Server {
    /// Create a new Server instance
    pub fn new(
        connect_participant_usecase: Arc<ConnectParticipantUseCase>,
        disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
        rename_participant_usecase: Arc<RenameParticipantUseCase>,
        send_tap_usecase: Arc<SendTapUseCase>,
    ) -> Self {
        Self {
            connect_participant_usecase,
            disconnect_participant_usecase,
            rename_participant_usecase,
            send_tap_usecase,
        }
    }

    /// Run the server until Ctrl+C or SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if either listener fails to bind or if there's an
    /// error during server execution.
    pub async fn run(
        self,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ws_listener = TcpListener::bind(config.ws_addr()).await?;
        let health_listener = TcpListener::bind(config.health_addr()).await?;

        tracing::info!(
            "Tap Bridge listening for WebSocket connections on {}",
            ws_listener.local_addr()?
        );
        tracing::info!(
            "Health check listening on http://{}",
            health_listener.local_addr()?
        );
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(ws_listener, health_listener, shutdown_signal())
            .await
    }

    /// Serve on already-bound listeners until `shutdown` resolves
    pub async fn serve(
        self,
        ws_listener: TcpListener,
        health_listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let app_state = Arc::new(AppState {
            connect_participant_usecase: self.connect_participant_usecase,
            disconnect_participant_usecase: self.disconnect_participant_usecase,
            rename_participant_usecase: self.rename_participant_usecase,
            send_tap_usecase: self.send_tap_usecase,
            dispatch: Default::default(),
        });

        // WebSocket エンドポイント（全パス）
        let app = Router::new()
            .fallback(websocket_handler)
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        // ヘルスチェック（全パス）
        let health_app = Router::new().fallback(health_check);

        // One signal stops both listeners
        let (stop_tx, stop_rx) = watch::channel(false);
        let health_server = tokio::spawn(async move {
            axum::serve(health_listener, health_app)
                .with_graceful_shutdown(wait_for_stop(stop_rx))
                .await
        });

        axum::serve(ws_listener, app)
            .with_graceful_shutdown(async move {
                shutdown.await;
                let _ = stop_tx.send(true);
            })
            .await?;

        health_server.await??;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

async fn wait_for_stop(mut stop_rx: watch::Receiver<bool>) {
    let _ = stop_rx.wait_for(|stop| *stop).await;
}
