//! The user-facing handle to a link.
//! 面向用户的链路句柄。

use super::command::LinkCommand;
use super::event_loop::LinkEventLoop;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::event::{Event, LinkState};
use crate::transport::Transport;
use bytes::Bytes;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};

/// The stream of lifecycle and data events reported by a link.
///
/// Events are delivered over an unbounded channel so worker tasks never
/// block on a slow consumer; consumers that need backpressure must add it
/// on their side.
///
/// 链路上报的生命周期与数据事件流。
///
/// 事件通过无界通道投递，工作任务不会因消费者缓慢而阻塞；
/// 需要背压的消费者应自行添加。
#[derive(Debug)]
pub struct LinkEvents {
    events_rx: mpsc::UnboundedReceiver<Event>,
}

impl LinkEvents {
    /// Waits for the next event. Returns `None` once the link is gone.
    /// 等待下一个事件。链路消失后返回 `None`。
    pub async fn next(&mut self) -> Option<Event> {
        self.events_rx.recv().await
    }
}

/// A handle to the link orchestrator actor.
///
/// 链路编排器 actor 的句柄。
pub struct Link<T: Transport> {
    command_tx: mpsc::Sender<LinkCommand<T>>,
    state_rx: watch::Receiver<LinkState>,
}

impl<T: Transport> Clone for Link<T> {
    fn clone(&self) -> Self {
        Self {
            command_tx: self.command_tx.clone(),
            state_rx: self.state_rx.clone(),
        }
    }
}

impl<T: Transport> Link<T> {
    /// Creates a new link over `transport` and spawns its orchestrator.
    ///
    /// The link starts out `Idle`; call [`Link::start`] to begin listening.
    /// Dropping every `Link` clone shuts the orchestrator and its workers
    /// down.
    ///
    /// 基于 `transport` 创建新链路并启动其编排器。
    ///
    /// 链路初始为 `Idle`；调用 [`Link::start`] 开始监听。
    /// 丢弃所有 `Link` 克隆会关停编排器及其工作任务。
    pub fn new(transport: T, config: Config) -> (Self, LinkEvents) {
        let (command_tx, command_rx) = mpsc::channel(config.channel.command_capacity);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(LinkState::Idle);

        let mut event_loop = LinkEventLoop::new(
            Arc::new(transport),
            Arc::new(config),
            command_rx,
            command_tx.downgrade(),
            events_tx,
            state_tx,
        );
        tokio::spawn(async move {
            event_loop.run().await;
        });

        (
            Self {
                command_tx,
                state_rx,
            },
            LinkEvents { events_rx },
        )
    }

    /// Starts listening for inbound connections, cancelling any in-flight
    /// dial and any active session. Fails only if the listening endpoint
    /// cannot be bound, in which case nothing is cancelled and the current
    /// state is kept.
    ///
    /// 开始监听入站连接，并取消任何进行中的拨号和活动会话。
    /// 仅当监听端点无法绑定时失败，此时不会取消任何东西，当前状态保持不变。
    pub async fn start(&self) -> Result<()> {
        let (ack, ack_rx) = oneshot::channel();
        self.command_tx
            .send(LinkCommand::Start { ack })
            .await
            .map_err(|_| Error::ChannelClosed)?;
        ack_rx.await.map_err(|_| Error::ChannelClosed)?
    }

    /// Starts an outbound dial to `peer`. Returns once the transition has
    /// been applied; the outcome of the dial itself is reported through the
    /// event stream.
    ///
    /// 向 `peer` 发起出站拨号。状态转换应用后即返回；
    /// 拨号本身的结果通过事件流上报。
    pub async fn connect(&self, peer: T::Addr) -> Result<()> {
        let (ack, ack_rx) = oneshot::channel();
        self.command_tx
            .send(LinkCommand::Connect { peer, ack })
            .await
            .map_err(|_| Error::ChannelClosed)?;
        ack_rx.await.map_err(|_| Error::ChannelClosed)
    }

    /// Tears every worker down and returns to `Idle`. Idempotent.
    ///
    /// 拆除所有工作任务并回到 `Idle`。幂等。
    pub async fn stop(&self) -> Result<()> {
        let (ack, ack_rx) = oneshot::channel();
        self.command_tx
            .send(LinkCommand::Stop { ack })
            .await
            .map_err(|_| Error::ChannelClosed)?;
        ack_rx.await.map_err(|_| Error::ChannelClosed)
    }

    /// Sends a payload over the active session. A write issued while no
    /// session is connected is a silent no-op.
    ///
    /// 通过活动会话发送负载。没有已连接会话时的写入是静默的空操作。
    pub async fn write(&self, payload: Bytes) -> Result<()> {
        self.command_tx
            .send(LinkCommand::Write { payload })
            .await
            .map_err(|_| Error::ChannelClosed)
    }

    /// A synchronous snapshot of the current lifecycle state.
    ///
    /// 当前生命周期状态的同步快照。
    pub fn state(&self) -> LinkState {
        *self.state_rx.borrow()
    }
}
