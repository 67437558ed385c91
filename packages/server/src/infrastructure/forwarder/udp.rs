//! UDP を使った TapForwarder 実装
//!
//! 宛先は起動時に一度だけ解決して固定します。送信は 1 回きりで、再送しません。

use std::{io, net::SocketAddr};

use async_trait::async_trait;
use tokio::net::{UdpSocket, lookup_host};

use crate::domain::{ForwardError, TapForwarder};

pub struct UdpTapForwarder {
    socket: UdpSocket,
    target: SocketAddr,
}

impl UdpTapForwarder {
    /// 宛先アドレスに合わせたエフェメラルポートのソケットを作成
    pub async fn bind(target: SocketAddr) -> io::Result<Self> {
        let local: SocketAddr = if target.is_ipv4() {
            ([0, 0, 0, 0], 0).into()
        } else {
            (std::net::Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(local).await?;
        Ok(Self { socket, target })
    }

    /// ホスト名を解決してからソケットを作成
    ///
    /// 複数のアドレスに解決された場合は IPv4 を優先する。
    pub async fn connect(host: &str, port: u16) -> io::Result<Self> {
        let addrs: Vec<SocketAddr> = lookup_host((host, port)).await?.collect();
        let target = addrs
            .iter()
            .find(|addr| addr.is_ipv4())
            .or_else(|| addrs.first())
            .copied()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no address found for {}:{}", host, port),
                )
            })?;
        Self::bind(target).await
    }

    pub fn target_addr(&self) -> SocketAddr {
        self.target
    }
}

#[async_trait]
impl TapForwarder for UdpTapForwarder {
    async fn forward(&self, datagram: Vec<u8>) -> Result<(), ForwardError> {
        let sent = self
            .socket
            .send_to(&datagram, self.target)
            .await
            .map_err(|source| ForwardError::Send {
                target: self.target.to_string(),
                source,
            })?;
        if sent != datagram.len() {
            return Err(ForwardError::Truncated {
                target: self.target.to_string(),
                sent,
                len: datagram.len(),
            });
        }
        tracing::debug!("Forwarded {} bytes to {}", sent, self.target);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_forward_delivers_datagram() {
        // テスト項目: データグラムが宛先にそのまま届く
        // given (前提条件):
        let engine = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let forwarder = UdpTapForwarder::bind(engine.local_addr().unwrap())
            .await
            .unwrap();

        // when (操作):
        let result = forwarder.forward(b"tap 1 a".to_vec()).await;

        // then (期待する結果):
        assert!(result.is_ok());
        let mut buf = [0u8; 64];
        let (len, _) = tokio::time::timeout(Duration::from_secs(2), engine.recv_from(&mut buf))
            .await
            .expect("datagram should arrive")
            .unwrap();
        assert_eq!(&buf[..len], b"tap 1 a");
    }

    #[tokio::test]
    async fn test_connect_resolves_localhost() {
        // テスト項目: ホスト名を解決して宛先が固定される
        // given (前提条件):
        let port = 7400;

        // when (操作):
        let forwarder = UdpTapForwarder::connect("localhost", port).await.unwrap();

        // then (期待する結果):
        assert_eq!(forwarder.target_addr().port(), port);
        assert!(forwarder.target_addr().ip().is_loopback());
    }
}
