//! WebSocket を使った MessagePusher 実装（ブロードキャストハブ）
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を管理
//! - クライアントへのイベント送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成と書き込みは UI 層（`ui/handler/websocket.rs`）が行います。
//! この実装は JSON を各接続のチャンネルに積むだけなので、遅いクライアントが
//! 他のクライアントへの配信やレジストリをブロックすることはありません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{MessagePushError, MessagePusher, OutboundEvent, ParticipantId, PusherChannel},
    infrastructure::dto::websocket::ServerMessage,
};

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let clients = Arc::new(Mutex::new(HashMap::new()));
/// let pusher = WebSocketMessagePusher::new(clients.clone());
///
/// pusher.broadcast(&OutboundEvent::ParticipantCount { count: 1 }).await?;
/// ```
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの送信チャンネル
    ///
    /// Key: ParticipantId
    /// Value: PusherChannel
    clients: Arc<Mutex<HashMap<ParticipantId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new(clients: Arc<Mutex<HashMap<ParticipantId, PusherChannel>>>) -> Self {
        Self { clients }
    }

    /// イベントを JSON にシリアライズ
    fn encode(event: &OutboundEvent) -> Result<String, MessagePushError> {
        serde_json::to_string(&ServerMessage::from(event))
            .map_err(|e| MessagePushError::Serialization(e.to_string()))
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(HashMap::new())))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, id: ParticipantId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(id, sender);
        tracing::debug!("Client {} registered to MessagePusher", id);
    }

    async fn unregister_client(&self, id: ParticipantId) {
        let mut clients = self.clients.lock().await;
        clients.remove(&id);
        tracing::debug!("Client {} unregistered from MessagePusher", id);
    }

    async fn push_to(
        &self,
        id: ParticipantId,
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError> {
        let content = Self::encode(event)?;
        let clients = self.clients.lock().await;

        let sender = clients
            .get(&id)
            .ok_or_else(|| MessagePushError::ClientNotFound(id.to_string()))?;
        sender
            .send(content)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed {} to client {}", event.kind(), id);
        Ok(())
    }

    async fn broadcast(&self, event: &OutboundEvent) -> Result<usize, MessagePushError> {
        // 1 回だけシリアライズして全員に配る
        let content = Self::encode(event)?;
        let clients = self.clients.lock().await;

        let mut delivered = 0;
        for (id, sender) in clients.iter() {
            if sender.is_closed() {
                tracing::debug!("Client {} is closing, skipping {}", id, event.kind());
                continue;
            }
            // ブロードキャストでは一部の送信失敗を許容
            match sender.send(content.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => tracing::warn!("Failed to push {} to client {}: {}", event.kind(), id, e),
            }
        }
        tracing::debug!("Broadcasted {} to {} client(s)", event.kind(), delivered);

        Ok(delivered)
    }
}
