//! Tap datagram translation.
//!
//! Pure function, no I/O: turns a tap into the payload the downstream engine
//! expects.

use super::value_object::{ParticipantId, TapKey};

/// Encode a tap as `tap <id> <key>`.
///
/// The key is written raw, without quoting or escaping.
pub fn encode_tap_datagram(id: ParticipantId, key: &TapKey) -> Vec<u8> {
    format!("tap {} {}", id, key.as_datagram_text()).into_bytes()
}
