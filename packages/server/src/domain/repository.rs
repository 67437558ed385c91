//! ParticipantRepository trait 定義
//!
//! 参加者レジストリへのインターフェース。具体的な実装は Infrastructure 層が提供します。

use async_trait::async_trait;

use super::{ParticipantId, ParticipantName, entity::Participant};

/// 参加者レジストリ
///
/// ID から参加者へのマッピングを保持する。他のコンポーネントへの通知は行わない。
#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    /// 次の連番 ID とデフォルト名で参加者を登録
    async fn register(&self) -> Participant;

    /// 参加者の名前を変更（存在しない場合は何もせず `false`）
    async fn rename(&self, id: ParticipantId, name: ParticipantName) -> bool;

    /// 参加者を削除（既に存在しない場合は `None`、冪等）
    async fn unregister(&self, id: ParticipantId) -> Option<Participant>;

    /// 参加者を取得
    async fn find(&self, id: ParticipantId) -> Option<Participant>;

    /// 接続中の参加者数
    async fn count(&self) -> usize;
}
