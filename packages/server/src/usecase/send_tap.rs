//! UseCase: タップ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendTapUseCase::execute() メソッド
//! - 下流エンジンへのデータグラム転送と、全員へのタップのブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - データグラムのフォーマットは下流エンジンとの唯一の契約
//! - 転送の失敗が送信者のセッションやブロードキャストに影響してはならない
//!
//! ### どのような状況を想定しているか
//! - 正常系：2 人接続中のタップ（送信者も受け取る）
//! - 異常系：下流に届かない、切断済みの参加者からのタップ

use std::sync::Arc;

use tapbridge_shared::time::Clock;
use tokio::task::JoinHandle;

use crate::domain::{
    ForwardError, MessagePusher, OutboundEvent, Participant, ParticipantId,
    ParticipantRepository, TapForwarder, TapKey, Timestamp, encode_tap_datagram,
};

use super::error::SendTapError;

/// タップ送信の結果
#[derive(Debug)]
pub struct TapOutcome {
    /// タップした参加者
    pub participant: Participant,
    /// ブロードキャストが届いた接続数
    pub delivered: usize,
    /// 下流への転送（fire-and-forget）。待つかどうか、結果をどう扱うかは呼び出し側が決める
    pub forward: JoinHandle<Result<(), ForwardError>>,
}

/// タップ送信のユースケース
pub struct SendTapUseCase {
    /// Repository（参加者レジストリの抽象化）
    repository: Arc<dyn ParticipantRepository>,
    /// MessagePusher（ブロードキャストハブの抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// TapForwarder（下流エンジンへの転送の抽象化）
    forwarder: Arc<dyn TapForwarder>,
    /// タイムスタンプ用の時計
    clock: Arc<dyn Clock>,
}

impl SendTapUseCase {
    /// 新しい SendTapUseCase を作成
    pub fn new(
        repository: Arc<dyn ParticipantRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        forwarder: Arc<dyn TapForwarder>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            forwarder,
            clock,
        }
    }

    /// タップ送信を実行
    ///
    /// # Arguments
    ///
    /// * `id` - タップした参加者の ID
    /// * `key` - クライアントが送ってきたキー
    ///
    /// # Returns
    ///
    /// * `Ok(TapOutcome)` - ブロードキャスト済み、転送は開始済み
    /// * `Err(SendTapError)` - 参加者が既にいない（何もしない）
    pub async fn execute(
        &self,
        id: ParticipantId,
        key: TapKey,
    ) -> Result<TapOutcome, SendTapError> {
        let participant = self
            .repository
            .find(id)
            .await
            .ok_or(SendTapError::ParticipantNotFound(id))?;

        // 1. 下流エンジンへ転送（完了を待たない）
        let datagram = encode_tap_datagram(id, &key);
        let forwarder = Arc::clone(&self.forwarder);
        let forward = tokio::spawn(async move { forwarder.forward(datagram).await });

        // 2. 送信者を含む全員にブロードキャスト
        let event = OutboundEvent::Tap {
            id,
            name: participant.name.clone(),
            key,
            timestamp: Timestamp::new(self.clock.now_millis()),
        };
        let delivered = match self.message_pusher.broadcast(&event).await {
            Ok(delivered) => delivered,
            Err(e) => {
                tracing::warn!("Failed to broadcast tap from participant {}: {}", id, e);
                0
            }
        };

        Ok(TapOutcome {
            participant,
            delivered,
            forward,
        })
    }
}
