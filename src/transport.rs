//! Traits for abstracting over the discoverable transport.
//!
//! The link core consumes these capabilities and never touches raw sockets
//! itself: a transport creates listening endpoints, dials remote peers, and
//! yields connected byte streams. Closing a resource is dropping it.
//!
//! 用于抽象可发现传输的 trait。
//!
//! 链路核心只消费这些能力，从不直接操作底层套接字：传输负责创建监听端点、
//! 拨号远端并产出已连接的字节流。释放资源即丢弃（drop）它。

use crate::error::Result;
use async_trait::async_trait;
use std::fmt::Debug;
use tokio::io::{AsyncRead, AsyncWrite};

pub mod tcp;

pub use tcp::TcpTransport;

/// A fixed token identifying which logical service a listener or dial
/// targets on the transport.
///
/// 标识监听或拨号在传输上针对哪个逻辑服务的固定令牌。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceId {
    /// Human-readable service name, used when registering the listener.
    /// 可读的服务名，在注册监听器时使用。
    pub name: String,
    /// The unique service token peers must agree on.
    /// 对端之间必须一致的唯一服务令牌。
    pub token: String,
}

impl Default for ServiceId {
    fn default() -> Self {
        Self {
            name: "pairlink".to_string(),
            token: "89cd20d0-afbc-11de-8a39-0800200c9a66".to_string(),
        }
    }
}

/// The identity of a remote peer as reported by the transport.
///
/// 传输上报的远端身份信息。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerInfo {
    /// Display name of the peer.
    /// 对端的显示名称。
    pub name: String,
}

/// An asynchronous discoverable transport.
///
/// This trait allows abstracting over the underlying transport, enabling
/// in-memory implementations for testing or alternative carriers in
/// production.
///
/// 异步可发现传输。
///
/// 此 trait 对底层传输进行抽象，便于测试时使用内存实现，或在生产中替换
/// 其他承载方式。
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// The address form used to identify a remote peer when dialing.
    type Addr: Clone + Debug + Send + Sync + 'static;
    /// A connected bidirectional byte stream.
    type Stream: AsyncRead + AsyncWrite + Send + Unpin + 'static;
    /// A listening endpoint bound to a service identifier.
    type Listener: ListeningEndpoint<Stream = Self::Stream>;

    /// Creates a listening endpoint bound to the given service identifier.
    /// 创建绑定到给定服务标识的监听端点。
    async fn listen(&self, service: &ServiceId) -> Result<Self::Listener>;

    /// Dials the remote endpoint identified by `peer` and the service
    /// identifier, yielding a connected stream and the peer's identity.
    /// 拨号由 `peer` 与服务标识确定的远端端点，产出已连接的流和对端身份。
    async fn dial(&self, peer: &Self::Addr, service: &ServiceId)
    -> Result<(Self::Stream, PeerInfo)>;
}

/// A listening endpoint yielding inbound connections.
///
/// 产出入站连接的监听端点。
#[async_trait]
pub trait ListeningEndpoint: Send + 'static {
    /// The stream type produced by `accept`.
    type Stream: AsyncRead + AsyncWrite + Send + Unpin + 'static;

    /// Waits for the next inbound connection. Dropping the endpoint makes a
    /// pending accept fail, which is how a blocked accept is unblocked.
    /// 等待下一个入站连接。丢弃端点会使挂起的 accept 失败，
    /// 这也是解除 accept 阻塞的方式。
    async fn accept(&mut self) -> Result<(Self::Stream, PeerInfo)>;
}
