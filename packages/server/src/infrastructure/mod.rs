//! Infrastructure 層
//!
//! ドメイン層の trait の具体的な実装（インメモリのレジストリ、WebSocket での送信、
//! UDP での転送）と、ワイヤーフォーマットの DTO を提供します。

pub mod dto;
pub mod forwarder;
pub mod message_pusher;
pub mod repository;
