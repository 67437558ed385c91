//! Data Transfer Objects for the WebSocket wire format.

pub mod conversion;
pub mod websocket;
