//! UseCase: 参加者切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - 登録解除と、残りの参加者への参加者数のブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 切断処理は接続ごとにちょうど 1 回だけ実行されなければならない
//! - 残りの参加者は減った参加者数を受け取る
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の切断と通知
//! - エッジケース：最後の参加者の切断（通知対象なし）
//! - 異常系：切断済みの参加者をもう一度切断

use std::sync::Arc;

use crate::domain::{MessagePusher, OutboundEvent, ParticipantId, ParticipantRepository};

use super::error::DisconnectError;

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    /// Repository（参加者レジストリの抽象化）
    repository: Arc<dyn ParticipantRepository>,
    /// MessagePusher（ブロードキャストハブの抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(
        repository: Arc<dyn ParticipantRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 参加者切断を実行
    ///
    /// # Arguments
    ///
    /// * `id` - 切断する参加者の ID
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - 残りの参加者数
    /// * `Err(DisconnectError::NotConnected)` - 既に切断処理済み（何も通知しない）
    pub async fn execute(&self, id: ParticipantId) -> Result<usize, DisconnectError> {
        // 1. レジストリから削除（存在しなければ切断処理済み）
        if self.repository.unregister(id).await.is_none() {
            return Err(DisconnectError::NotConnected(id));
        }

        // 2. ブロードキャストハブから登録解除
        self.message_pusher.unregister_client(id).await;

        // 3. 残りの参加者に参加者数をブロードキャスト
        let remaining = self.repository.count().await;
        if let Err(e) = self
            .message_pusher
            .broadcast(&OutboundEvent::ParticipantCount { count: remaining })
            .await
        {
            tracing::warn!("Failed to broadcast participant count: {}", e);
        }

        Ok(remaining)
    }
}
