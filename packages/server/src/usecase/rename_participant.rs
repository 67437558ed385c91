//! UseCase: 参加者の改名処理

use std::sync::Arc;

use crate::domain::{
    MessagePusher, OutboundEvent, Participant, ParticipantId, ParticipantName,
    ParticipantRepository,
};

use super::error::RenameError;

/// 参加者改名のユースケース
pub struct RenameParticipantUseCase {
    repository: Arc<dyn ParticipantRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl RenameParticipantUseCase {
    pub fn new(
        repository: Arc<dyn ParticipantRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 改名を実行し、参加者数（変化なし）を全員にブロードキャストする
    ///
    /// 名前は検証しない。参加者が既にいない場合は何もしない。
    pub async fn execute(
        &self,
        id: ParticipantId,
        name: ParticipantName,
    ) -> Result<Participant, RenameError> {
        if !self.repository.rename(id, name).await {
            return Err(RenameError::ParticipantNotFound(id));
        }
        let participant = self
            .repository
            .find(id)
            .await
            .ok_or(RenameError::ParticipantNotFound(id))?;

        let count = OutboundEvent::ParticipantCount {
            count: self.repository.count().await,
        };
        if let Err(e) = self.message_pusher.broadcast(&count).await {
            tracing::warn!("Failed to broadcast participant count: {}", e);
        }

        Ok(participant)
    }
}
