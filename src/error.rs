//! 定义了库中所有可能的错误类型。
//! Defines all possible error types in the library.

use thiserror::Error;

/// The primary error type for the peer link library.
/// 对等链路库的主要错误类型。
#[derive(Debug, Error)]
pub enum Error {
    /// Binding the listening endpoint failed. This is fatal for `start`;
    /// the caller must address the cause before retrying.
    /// 绑定监听端点失败。对 `start` 而言是致命错误；调用方需先解决原因再重试。
    #[error("failed to bind listening endpoint: {0}")]
    Bind(#[source] std::io::Error),

    /// An outbound dial attempt failed.
    /// 出站拨号尝试失败。
    #[error("dial failed: {0}")]
    Dial(#[source] std::io::Error),

    /// An underlying I/O error occurred.
    /// 发生了底层的I/O错误。
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An internal channel for communication between tasks was closed unexpectedly.
    /// 用于任务间通信的内部通道意外关闭。
    #[error("Internal channel is broken")]
    ChannelClosed,
}

/// A specialized `Result` type for this library.
/// 本库专用的 `Result` 类型。
pub type Result<T> = std::result::Result<T, Error>;
