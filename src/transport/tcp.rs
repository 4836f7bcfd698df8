//! TCP implementation of the transport capability.
//! 传输能力的 TCP 实现。

use super::{ListeningEndpoint, PeerInfo, ServiceId, Transport};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};
use tracing::debug;

/// A transport over plain TCP.
///
/// The service identifier is not carried on the wire; peers are expected to
/// agree on it out of band.
///
/// 基于纯 TCP 的传输。
///
/// 服务标识不会在线路上传输，需要对端在带外达成一致。
#[derive(Debug, Clone)]
pub struct TcpTransport {
    listen_addr: SocketAddr,
}

impl TcpTransport {
    /// Creates a TCP transport that will bind its listening endpoint to
    /// `listen_addr`.
    /// 创建一个 TCP 传输，其监听端点将绑定到 `listen_addr`。
    pub fn new(listen_addr: SocketAddr) -> Self {
        Self { listen_addr }
    }
}

#[async_trait]
impl Transport for TcpTransport {
    type Addr = SocketAddr;
    type Stream = TcpStream;
    type Listener = TcpEndpoint;

    async fn listen(&self, service: &ServiceId) -> Result<TcpEndpoint> {
        let listener = TcpListener::bind(self.listen_addr)
            .await
            .map_err(Error::Bind)?;
        debug!(
            addr = ?listener.local_addr().ok(),
            service = %service.name,
            "TCP listening endpoint bound"
        );
        Ok(TcpEndpoint { listener })
    }

    async fn dial(
        &self,
        peer: &SocketAddr,
        _service: &ServiceId,
    ) -> Result<(TcpStream, PeerInfo)> {
        let stream = TcpStream::connect(peer).await.map_err(Error::Dial)?;
        // Disable Nagle's algorithm for lower latency.
        stream.set_nodelay(true)?;
        Ok((
            stream,
            PeerInfo {
                name: peer.to_string(),
            },
        ))
    }
}

/// A bound TCP listening endpoint.
/// 已绑定的 TCP 监听端点。
#[derive(Debug)]
pub struct TcpEndpoint {
    listener: TcpListener,
}

#[async_trait]
impl ListeningEndpoint for TcpEndpoint {
    type Stream = TcpStream;

    async fn accept(&mut self) -> Result<(TcpStream, PeerInfo)> {
        let (stream, addr) = self.listener.accept().await?;
        stream.set_nodelay(true)?;
        Ok((
            stream,
            PeerInfo {
                name: addr.to_string(),
            },
        ))
    }
}
