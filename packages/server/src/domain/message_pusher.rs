//! MessagePusher trait 定義
//!
//! クライアントへのイベント送信（通知）のインターフェース。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{MessagePushError, OutboundEvent, ParticipantId};

/// 接続ごとの送信チャンネル（シリアライズ済みの JSON を流す）
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続の送信チャンネルを登録
    async fn register_client(&self, id: ParticipantId, sender: PusherChannel);

    /// 接続の送信チャンネルを登録解除
    async fn unregister_client(&self, id: ParticipantId);

    /// 特定のクライアントにイベントを送信
    async fn push_to(&self, id: ParticipantId, event: &OutboundEvent)
    -> Result<(), MessagePushError>;

    /// 開いている全ての接続にイベントを送信
    ///
    /// 一部の送信失敗は許容する。届いた接続数を返す。
    async fn broadcast(&self, event: &OutboundEvent) -> Result<usize, MessagePushError>;
}
