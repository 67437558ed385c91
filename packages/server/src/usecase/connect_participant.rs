//! UseCase: 参加者接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() メソッド
//! - 登録、welcome の送信、参加者数のブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 新規接続は welcome を自分だけが受け取り、参加者数は全員が受け取る
//! - welcome の後に参加者数が届く順序をクライアントが前提にしている
//!
//! ### どのような状況を想定しているか
//! - 正常系：1 人目、2 人目の接続
//! - 異常系：welcome を送れない（接続が既に閉じている）

use std::sync::Arc;

use crate::domain::{
    MessagePusher, OutboundEvent, Participant, ParticipantRepository, PusherChannel,
};

use super::error::ConnectError;

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    /// Repository（参加者レジストリの抽象化）
    repository: Arc<dyn ParticipantRepository>,
    /// MessagePusher（ブロードキャストハブの抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(
        repository: Arc<dyn ParticipantRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 参加者接続を実行
    ///
    /// # Arguments
    ///
    /// * `sender` - 新しい接続へのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(Participant)` - 登録された参加者
    /// * `Err(ConnectError)` - welcome を送れなかった（登録は取り消し済み）
    pub async fn execute(&self, sender: PusherChannel) -> Result<Participant, ConnectError> {
        // 1. レジストリに登録（ID の採番）
        let participant = self.repository.register().await;

        // 2. ブロードキャストハブに接続を登録
        self.message_pusher
            .register_client(participant.id, sender)
            .await;

        // 3. 新しい接続にだけ welcome を送る
        let welcome = OutboundEvent::Welcome {
            id: participant.id,
            name: participant.name.clone(),
            participant_count: self.repository.count().await,
        };
        if let Err(e) = self.message_pusher.push_to(participant.id, &welcome).await {
            self.message_pusher.unregister_client(participant.id).await;
            self.repository.unregister(participant.id).await;
            return Err(ConnectError::WelcomeFailed(e));
        }

        // 4. 参加者数を全員にブロードキャスト
        let count = OutboundEvent::ParticipantCount {
            count: self.repository.count().await,
        };
        if let Err(e) = self.message_pusher.broadcast(&count).await {
            tracing::warn!("Failed to broadcast participant count: {}", e);
        }

        Ok(participant)
    }
}
