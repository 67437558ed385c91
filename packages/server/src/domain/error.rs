//! ドメイン層のエラー型

use thiserror::Error;

/// MessagePusher のエラー
#[derive(Debug, Error, PartialEq)]
pub enum MessagePushError {
    /// 宛先のクライアントが登録されていない
    #[error("Client '{0}' not found")]
    ClientNotFound(String),

    /// 送信チャンネルが閉じている
    #[error("Failed to push message: {0}")]
    PushFailed(String),

    /// イベントを JSON に変換できなかった
    #[error("Failed to serialize event: {0}")]
    Serialization(String),
}

/// 下流エンジンへの転送エラー
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("Failed to send datagram to {target}: {source}")]
    Send {
        target: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Datagram to {target} was truncated ({sent} of {len} bytes sent)")]
    Truncated {
        target: String,
        sent: usize,
        len: usize,
    },
}
