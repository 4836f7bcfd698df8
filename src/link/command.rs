//! Commands processed by the link orchestrator actor.
//! 链路编排器 actor 处理的命令。

use crate::error::Result;
use crate::transport::{PeerInfo, Transport};
use bytes::Bytes;
use tokio::sync::oneshot;

/// Commands sent to the orchestrator actor.
///
/// External commands from the `Link` handle and completion callbacks from
/// worker tasks funnel through the same channel; consuming them one at a
/// time is what serializes every state transition.
///
/// 发送给编排器 actor 的命令。
///
/// 来自 `Link` 句柄的外部命令与来自工作任务的完成回调汇入同一条通道；
/// 逐个消费它们即是对所有状态转换的串行化。
pub(crate) enum LinkCommand<T: Transport> {
    /// Enter listening mode, cancelling any dial and any active session.
    /// 进入监听模式，取消任何拨号和活动会话。
    Start {
        ack: oneshot::Sender<Result<()>>,
    },
    /// Dial the given peer, cancelling any previous dial and any active
    /// session. The listener keeps running.
    /// 拨号给定的对端，取消之前的拨号和活动会话。监听器继续运行。
    Connect {
        peer: T::Addr,
        ack: oneshot::Sender<()>,
    },
    /// Tear every worker down and return to idle.
    /// 拆除所有工作任务并回到空闲状态。
    Stop { ack: oneshot::Sender<()> },
    /// Forward a payload to the active session, if any.
    /// 将负载转发给活动会话（如果有）。
    Write { payload: Bytes },
    /// A listener accepted an inbound connection.
    /// 监听器接受了一个入站连接。
    InboundAccepted { stream: T::Stream, peer: PeerInfo },
    /// A connector finished its dial successfully.
    /// 某个拨号任务成功完成。
    DialSucceeded {
        generation: u64,
        stream: T::Stream,
        peer: PeerInfo,
    },
    /// A connector's dial failed (and was not cancelled).
    /// 某个拨号任务失败（且并非被取消）。
    DialFailed { generation: u64 },
    /// The active session's read loop hit an error or end-of-stream.
    /// 活动会话的读取循环遇到错误或流结束。
    SessionReadFailed { generation: u64 },
}
