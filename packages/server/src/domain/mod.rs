//! ドメイン層
//!
//! 参加者・タップイベントのモデルと、外側の層が実装するインターフェース
//! （`ParticipantRepository`, `MessagePusher`, `TapForwarder`）を定義します。

pub mod entity;
pub mod error;
pub mod event;
pub mod forwarder;
pub mod message_pusher;
pub mod repository;
pub mod translator;
pub mod value_object;

pub use entity::Participant;
pub use error::{ForwardError, MessagePushError};
pub use event::OutboundEvent;
pub use forwarder::TapForwarder;
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::ParticipantRepository;
pub use translator::encode_tap_datagram;
pub use value_object::{ParticipantId, ParticipantName, TapKey, Timestamp};
