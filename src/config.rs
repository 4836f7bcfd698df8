//! 定义了链路的可配置参数。
//! Defines configurable parameters for the link.

use crate::transport::ServiceId;

/// A structure containing all configurable parameters for a link.
///
/// 包含链路所有可配置参数的结构体。
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// The service identifier this link listens under and dials with.
    /// 本链路用于监听和拨号的服务标识。
    pub service: ServiceId,

    /// Active-session parameters.
    /// 活动会话相关参数。
    pub session: SessionConfig,

    /// Internal channel parameters.
    /// 内部通道相关参数。
    pub channel: ChannelConfig,
}

/// Active-session parameters.
///
/// 活动会话相关参数。
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// The size of the buffer the session read loop reads into. Each
    /// `DataReceived` payload is at most this large.
    /// 会话读取循环所用缓冲区的大小。每个 `DataReceived` 负载不会超过该大小。
    pub read_buffer_size: usize,
    /// The capacity of the per-session outbound write queue.
    /// 每个会话出站写入队列的容量。
    pub outbound_queue_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            read_buffer_size: 1024,
            outbound_queue_capacity: 64,
        }
    }
}

/// Internal channel parameters.
///
/// 内部通道相关参数。
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// The capacity of the orchestrator's command channel.
    /// 编排器命令通道的容量。
    pub command_capacity: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            command_capacity: 128,
        }
    }
}
