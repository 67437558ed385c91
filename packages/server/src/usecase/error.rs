//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::{MessagePushError, ParticipantId};

/// 参加者接続のエラー
#[derive(Debug, Error, PartialEq)]
pub enum ConnectError {
    /// welcome を新規接続に届けられなかった（登録は取り消される）
    #[error("Failed to send welcome: {0}")]
    WelcomeFailed(#[from] MessagePushError),
}

/// 参加者切断のエラー
#[derive(Debug, Error, PartialEq)]
pub enum DisconnectError {
    /// 既に切断処理済み
    #[error("Participant {0} is not connected")]
    NotConnected(ParticipantId),
}

/// 参加者改名のエラー
#[derive(Debug, Error, PartialEq)]
pub enum RenameError {
    #[error("Participant {0} not found")]
    ParticipantNotFound(ParticipantId),
}

/// タップ送信のエラー
#[derive(Debug, Error, PartialEq)]
pub enum SendTapError {
    #[error("Participant {0} not found")]
    ParticipantNotFound(ParticipantId),
}
