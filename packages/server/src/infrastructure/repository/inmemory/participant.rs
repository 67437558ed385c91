//! InMemory Participant Repository 実装
//!
//! ドメイン層が定義する ParticipantRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。永続化はしません。
//!
//! ## 既知の制限
//!
//! エントリは切断通知でのみ削除されます。応答しないクライアントも
//! トランスポートが切断を報告するまで登録されたままです。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Participant, ParticipantId, ParticipantName, ParticipantRepository};

/// レジストリの内部状態
#[derive(Debug)]
struct Registry {
    /// 最後に割り当てた ID（0 は未割り当て）
    last_id: ParticipantId,
    participants: HashMap<ParticipantId, Participant>,
}

/// インメモリ Participant Repository 実装
#[derive(Debug)]
pub struct InMemoryParticipantRepository {
    registry: Mutex<Registry>,
}

impl InMemoryParticipantRepository {
    /// 空のレジストリを作成
    pub fn new() -> Self {
        Self {
            registry: Mutex::new(Registry {
                last_id: ParticipantId::new(0),
                participants: HashMap::new(),
            }),
        }
    }
}

impl Default for InMemoryParticipantRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ParticipantRepository for InMemoryParticipantRepository {
    async fn register(&self) -> Participant {
        let mut registry = self.registry.lock().await;
        let id = registry.last_id.next();
        registry.last_id = id;

        let participant = Participant::new(id);
        registry.participants.insert(id, participant.clone());
        participant
    }

    async fn rename(&self, id: ParticipantId, name: ParticipantName) -> bool {
        let mut registry = self.registry.lock().await;
        match registry.participants.get_mut(&id) {
            Some(participant) => {
                participant.rename(name);
                true
            }
            None => false,
        }
    }

    async fn unregister(&self, id: ParticipantId) -> Option<Participant> {
        let mut registry = self.registry.lock().await;
        registry.participants.remove(&id)
    }

    async fn find(&self, id: ParticipantId) -> Option<Participant> {
        let registry = self.registry.lock().await;
        registry.participants.get(&id).cloned()
    }

    async fn count(&self) -> usize {
        let registry = self.registry.lock().await;
        registry.participants.len()
    }
}
