//! UseCase 層
//!
//! 接続・切断・改名・タップの各イベントを、レジストリとブロードキャストハブ、
//! 下流への転送の組み合わせとして実行します。
//!
//! 各ユースケースは UI 層が直列化されたターンの中で呼び出す前提です
//! （`ui::state::AppState::dispatch`）。

mod connect_participant;
mod disconnect_participant;
mod error;
mod rename_participant;
mod send_tap;

pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{ConnectError, DisconnectError, RenameError, SendTapError};
pub use rename_participant::RenameParticipantUseCase;
pub use send_tap::{SendTapUseCase, TapOutcome};
