//! Outbound events
//!
//! サーバーからクライアントへ送るイベントのドメインモデル。
//! ワイヤーフォーマット（JSON）への変換は Infrastructure 層の DTO が担う。

use super::value_object::{ParticipantId, ParticipantName, TapKey, Timestamp};

#[derive(Debug, Clone, PartialEq)]
pub enum OutboundEvent {
    /// 新規接続したクライアントにだけ送る
    Welcome {
        id: ParticipantId,
        name: ParticipantName,
        participant_count: usize,
    },
    /// 参加者数の更新（全員に送る）
    ParticipantCount { count: usize },
    /// タップの通知（送信者を含む全員に送る）
    Tap {
        id: ParticipantId,
        name: ParticipantName,
        key: TapKey,
        timestamp: Timestamp,
    },
}

impl OutboundEvent {
    /// ログ用のイベント種別
    pub fn kind(&self) -> &'static str {
        match self {
            OutboundEvent::Welcome { .. } => "welcome",
            OutboundEvent::ParticipantCount { .. } => "participantCount",
            OutboundEvent::Tap { .. } => "tap",
        }
    }
}
