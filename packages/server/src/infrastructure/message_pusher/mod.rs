//! メッセージ送信（通知）の実装
//!
//! - `websocket`: 接続ごとの送信チャンネルを使った実装（ブロードキャストハブ）

pub mod websocket;

pub use websocket::WebSocketMessagePusher;
