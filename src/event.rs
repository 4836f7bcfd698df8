//! 定义了链路的生命周期状态以及上报给事件消费者的事件。
//! Defines the link lifecycle states and the events reported to the event consumer.

use bytes::Bytes;

/// The lifecycle state of a link. Exactly one state holds at any instant and
/// it is the single source of truth for which workers may legitimately run.
///
/// 链路的生命周期状态。任一时刻恰好处于一个状态，它是判断哪些工作任务
/// 可以合法运行的唯一依据。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// No workers are running.
    /// 没有任何工作任务在运行。
    Idle,
    /// A listener is accepting inbound connections.
    /// 监听器正在接受入站连接。
    Listening,
    /// An outbound dial is in flight. The listener may still be running;
    /// an inbound connection can win the race.
    /// 出站拨号正在进行。监听器可能仍在运行，入站连接仍可能抢先。
    Connecting,
    /// Exactly one session is active.
    /// 恰好有一个会话处于活动状态。
    Connected,
}

/// An event reported to the external consumer.
///
/// A `StateChanged(Connected)` always precedes any `DataReceived`/`DataSent`
/// for that session, and a `TransientFailure` precedes the `StateChanged(Idle)`
/// that follows a recoverable failure.
///
/// 上报给外部消费者的事件。
///
/// `StateChanged(Connected)` 一定先于该会话的任何 `DataReceived`/`DataSent`；
/// `TransientFailure` 一定先于可恢复失败之后的 `StateChanged(Idle)`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The lifecycle state changed.
    /// 生命周期状态发生了变化。
    StateChanged(LinkState),
    /// The name of the peer of a newly promoted session.
    /// 新提升会话的对端名称。
    PeerIdentified(String),
    /// A payload was received on the active session.
    /// 活动会话上收到了一段数据。
    DataReceived(Bytes),
    /// A payload was written out on the active session.
    /// 活动会话上成功写出了一段数据。
    DataSent(Bytes),
    /// A recoverable failure, with a human-readable reason. The link returns
    /// to listening on its own; no caller intervention is required.
    /// 可恢复的失败，附带可读的原因。链路会自行回到监听状态，无需调用方干预。
    TransientFailure(String),
}
