//! Entities

use super::value_object::{ParticipantId, ParticipantName};

/// 接続中の参加者
///
/// 接続時に生成され、本人の `setName` によってのみ名前が変わり、切断時に削除される。
/// 接続ハンドル（送信チャンネル）は `MessagePusher` 側が同じ ID で保持する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: ParticipantName,
}

impl Participant {
    /// デフォルト名で新しい参加者を作成
    pub fn new(id: ParticipantId) -> Self {
        Self {
            id,
            name: ParticipantName::default_for(id),
        }
    }

    pub fn rename(&mut self, name: ParticipantName) {
        self.name = name;
    }
}
