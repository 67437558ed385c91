//! WebSocket message DTOs.
//!
//! Every frame is a JSON object tagged by its `type` field.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Client → server messages.
///
/// Decoded once at the boundary. Frames that do not fit any variant fail to
/// decode; objects with an unrecognized `type` decode to `Unknown`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// `{"type":"tap","key":<value>}`
    Tap { key: Value },
    /// `{"type":"setName","name":<string>}`
    SetName { name: String },
    #[serde(other)]
    Unknown,
}

impl ClientMessage {
    /// Decode a text or binary frame payload.
    pub fn decode(payload: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(payload)
    }
}

/// Server → client messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// `{"type":"welcome","id":<int>,"name":<string>,"participantCount":<int>}`
    Welcome {
        id: u64,
        name: String,
        #[serde(rename = "participantCount")]
        participant_count: usize,
    },
    /// `{"type":"participantCount","count":<int>}`
    ParticipantCount { count: usize },
    /// `{"type":"tap","id":<int>,"name":<string>,"key":<value>,"timestamp":<epoch-millis>}`
    Tap {
        id: u64,
        name: String,
        key: Value,
        timestamp: i64,
    },
}
