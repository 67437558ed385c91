//! Server state shared by the connection handlers.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::usecase::{
    ConnectParticipantUseCase, DisconnectParticipantUseCase, RenameParticipantUseCase,
    SendTapUseCase,
};

/// Shared application state
pub struct AppState {
    /// ConnectParticipantUseCase（参加者接続のユースケース）
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    /// DisconnectParticipantUseCase（参加者切断のユースケース）
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// RenameParticipantUseCase（参加者改名のユースケース）
    pub rename_participant_usecase: Arc<RenameParticipantUseCase>,
    /// SendTapUseCase（タップ送信のユースケース）
    pub send_tap_usecase: Arc<SendTapUseCase>,
    /// Dispatch turn.
    ///
    /// Every connect, inbound event and close runs its use case while holding
    /// this lock, so handlers of different connections never interleave and
    /// the registry and hub see a single writer at a time.
    pub dispatch: Mutex<()>,
}
