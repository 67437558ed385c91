//! TapForwarder trait 定義
//!
//! 下流のサウンドエンジンへタップを届けるインターフェース。

use async_trait::async_trait;

use super::ForwardError;

/// 固定の宛先へデータグラムを 1 回だけ送る（再送なし）
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TapForwarder: Send + Sync {
    async fn forward(&self, datagram: Vec<u8>) -> Result<(), ForwardError>;
}
