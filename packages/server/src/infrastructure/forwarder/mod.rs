//! 下流エンジンへの転送の実装
//!
//! - `udp`: UDP データグラムでの実装

pub mod udp;

pub use udp::UdpTapForwarder;
