//! Conversion logic between DTOs and domain types.

use serde_json::Value;

use crate::domain::{OutboundEvent, TapKey};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// DTO → Domain
// ========================================

impl From<Value> for TapKey {
    fn from(value: Value) -> Self {
        TapKey::new(value)
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<&OutboundEvent> for dto::ServerMessage {
    fn from(event: &OutboundEvent) -> Self {
        match event {
            OutboundEvent::Welcome {
                id,
                name,
                participant_count,
            } => Self::Welcome {
                id: id.value(),
                name: name.as_str().to_string(),
                participant_count: *participant_count,
            },
            OutboundEvent::ParticipantCount { count } => Self::ParticipantCount { count: *count },
            OutboundEvent::Tap {
                id,
                name,
                key,
                timestamp,
            } => Self::Tap {
                id: id.value(),
                name: name.as_str().to_string(),
                key: key.as_value().clone(),
                timestamp: timestamp.value(),
            },
        }
    }
}
