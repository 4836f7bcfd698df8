//! The orchestrator's serialized transition executor.
//!
//! One actor task owns the lifecycle state and the at-most-one-each worker
//! handles, and applies every transition by consuming commands in order.
//! Whichever completion reaches the actor first wins a promotion race; the
//! loser's stream is dropped (closed) here rather than leaked.
//!
//! 编排器的串行化状态转换执行器。
//!
//! 一个 actor 任务拥有生命周期状态和至多各一个的工作任务句柄，按顺序消费
//! 命令来应用所有状态转换。谁的完成结果先到达 actor，谁就赢得提升竞争；
//! 输家的流会在这里被丢弃（关闭），而不是泄漏。

use super::command::LinkCommand;
use crate::config::Config;
use crate::event::{Event, LinkState};
use crate::transport::{PeerInfo, Transport};
use crate::worker::connector::{self, ConnectorHandle};
use crate::worker::listener::{self, ListenerHandle};
use crate::worker::session::{self, SessionHandle};
use bytes::Bytes;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

/// Reason reported when an outbound dial fails.
/// 出站拨号失败时上报的原因。
pub(crate) const DIAL_FAILED_REASON: &str = "Unable to connect device";
/// Reason reported when an established session is lost.
/// 已建立的会话丢失时上报的原因。
pub(crate) const CONNECTION_LOST_REASON: &str = "Device connection was lost";

/// The actor that owns the lifecycle state machine and all worker handles.
///
/// 拥有生命周期状态机和全部工作任务句柄的 actor。
pub(crate) struct LinkEventLoop<T: Transport> {
    transport: Arc<T>,
    config: Arc<Config>,
    command_rx: mpsc::Receiver<LinkCommand<T>>,
    /// Weak so the actor does not keep its own channel alive: once every
    /// handle is gone the loop drains and exits.
    /// 使用弱引用，避免 actor 维持自己的通道：所有句柄消失后循环即退出。
    command_tx: mpsc::WeakSender<LinkCommand<T>>,
    events: mpsc::UnboundedSender<Event>,
    state_tx: watch::Sender<LinkState>,
    listener: Option<ListenerHandle>,
    connector: Option<ConnectorHandle>,
    session: Option<SessionHandle>,
    generation: u64,
}

impl<T: Transport> LinkEventLoop<T> {
    pub(crate) fn new(
        transport: Arc<T>,
        config: Arc<Config>,
        command_rx: mpsc::Receiver<LinkCommand<T>>,
        command_tx: mpsc::WeakSender<LinkCommand<T>>,
        events: mpsc::UnboundedSender<Event>,
        state_tx: watch::Sender<LinkState>,
    ) -> Self {
        Self {
            transport,
            config,
            command_rx,
            command_tx,
            events,
            state_tx,
            listener: None,
            connector: None,
            session: None,
            generation: 0,
        }
    }

    /// Runs the actor's main loop until every `Link` handle is dropped.
    ///
    /// 运行 actor 的主循环，直到所有 `Link` 句柄都被丢弃。
    pub(crate) async fn run(&mut self) {
        while let Some(command) = self.command_rx.recv().await {
            self.handle_command(command).await;
        }
        self.teardown();
        debug!("Link orchestrator exiting");
    }

    async fn handle_command(&mut self, command: LinkCommand<T>) {
        match command {
            LinkCommand::Start { ack } => {
                let _ = ack.send(self.start().await);
            }
            LinkCommand::Connect { peer, ack } => {
                self.connect(peer);
                let _ = ack.send(());
            }
            LinkCommand::Stop { ack } => {
                self.stop();
                let _ = ack.send(());
            }
            LinkCommand::Write { payload } => self.write(payload),
            LinkCommand::InboundAccepted { stream, peer } => {
                self.inbound_accepted(stream, peer)
            }
            LinkCommand::DialSucceeded {
                generation,
                stream,
                peer,
            } => self.dial_succeeded(generation, stream, peer),
            LinkCommand::DialFailed { generation } => self.dial_failed(generation).await,
            LinkCommand::SessionReadFailed { generation } => {
                self.session_read_failed(generation).await
            }
        }
    }

    /// Cancels any dial and any active session, then (re-)enters listening
    /// mode. An already-running listener is reused, never duplicated.
    ///
    /// The bind happens before anything is torn down: a failed bind must
    /// leave the current state and its workers untouched, so the state never
    /// claims more than what is actually running.
    ///
    /// 取消任何拨号和活动会话，然后（重新）进入监听模式。
    /// 已在运行的监听器会被复用，绝不重复创建。
    ///
    /// 绑定先于任何拆除动作：绑定失败必须保持当前状态及其工作任务原样，
    /// 这样状态永远不会声称比实际运行中的更多。
    async fn start(&mut self) -> crate::error::Result<()> {
        let endpoint = match self.listener {
            Some(_) => None,
            None => Some(self.transport.listen(&self.config.service).await?),
        };
        if let Some(connector) = self.connector.take() {
            connector.cancel();
        }
        if let Some(session) = self.session.take() {
            session.cancel();
        }
        if let Some(endpoint) = endpoint {
            self.listener = Some(listener::spawn(
                endpoint,
                self.state_tx.subscribe(),
                self.command_tx.clone(),
            ));
            info!(service = %self.config.service.name, "Listener started");
        }
        self.set_state(LinkState::Listening);
        Ok(())
    }

    /// Starts an outbound dial. The listener is deliberately left running:
    /// an inbound connection may still win the race.
    ///
    /// 发起出站拨号。监听器被有意保留运行：入站连接仍可能抢先。
    fn connect(&mut self, peer: T::Addr) {
        if let Some(connector) = self.connector.take() {
            connector.cancel();
        }
        if let Some(session) = self.session.take() {
            session.cancel();
        }
        let generation = self.next_generation();
        info!(?peer, generation, "Dialing peer");
        self.connector = Some(connector::spawn(
            self.transport.clone(),
            peer,
            self.config.service.clone(),
            generation,
            self.command_tx.clone(),
        ));
        self.set_state(LinkState::Connecting);
    }

    /// Tears every worker down and returns to idle. Idempotent.
    ///
    /// 拆除所有工作任务并回到空闲状态。幂等。
    fn stop(&mut self) {
        info!("Stopping link");
        self.teardown();
        self.set_state(LinkState::Idle);
    }

    fn teardown(&mut self) {
        if let Some(connector) = self.connector.take() {
            connector.cancel();
        }
        if let Some(session) = self.session.take() {
            session.cancel();
        }
        if let Some(listener) = self.listener.take() {
            listener.cancel();
        }
    }

    /// Forwards a payload to the active session without ever blocking the
    /// transition executor. A payload arriving while no session is connected
    /// is dropped silently: the caller is racing a teardown, which is an
    /// accepted behavior, not an error.
    ///
    /// 在不阻塞转换执行器的前提下将负载转发给活动会话。没有会话时到达的
    /// 负载会被静默丢弃：调用方正与拆除过程竞争，这是约定行为而非错误。
    fn write(&mut self, payload: Bytes) {
        if self.state() != LinkState::Connected {
            return;
        }
        let Some(session) = self.session.as_ref() else {
            return;
        };
        match session.try_send(payload) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("Session outbound queue full, dropping payload");
                self.emit(Event::TransientFailure(
                    session::WRITE_FAILED_REASON.to_string(),
                ));
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                // The session is being torn down concurrently; same contract
                // as a write landing on an already-cancelled session.
                debug!("Write raced session teardown, dropping payload");
            }
        }
    }

    fn inbound_accepted(&mut self, stream: T::Stream, peer: PeerInfo) {
        match self.state() {
            LinkState::Listening | LinkState::Connecting => self.promote(stream, peer),
            LinkState::Idle | LinkState::Connected => {
                // Lost the race, or arrived after a stop. The stream is
                // closed here rather than leaked.
                debug!(peer = %peer.name, state = ?self.state(), "Discarding inbound connection");
                drop(stream);
            }
        }
    }

    fn dial_succeeded(&mut self, generation: u64, stream: T::Stream, peer: PeerInfo) {
        let current = self.connector.as_ref().map(|c| c.generation);
        if current != Some(generation) {
            // A newer dial or a promotion superseded this attempt.
            debug!(generation, "Discarding stale dial result");
            drop(stream);
            return;
        }
        self.connector = None;
        self.promote(stream, peer);
    }

    /// Converts a successful dial or inbound accept into the single active
    /// session. Every competing worker is cancelled first, so at most one
    /// session is ever live. The session tasks are spawned only after the
    /// `Connected` state change has been emitted, so no data event can
    /// precede it.
    ///
    /// 将成功的拨号或入站连接转化为唯一的活动会话。所有竞争的工作任务都会
    /// 先被取消，因此任一时刻至多一个会话存活。会话任务在 `Connected`
    /// 状态事件发出之后才启动，数据事件不可能先于它。
    fn promote(&mut self, stream: T::Stream, peer: PeerInfo) {
        if let Some(connector) = self.connector.take() {
            connector.cancel();
        }
        if let Some(listener) = self.listener.take() {
            listener.cancel();
        }
        if let Some(session) = self.session.take() {
            session.cancel();
        }

        let generation = self.next_generation();
        info!(peer = %peer.name, generation, "Session promoted");
        self.emit(Event::PeerIdentified(peer.name));
        self.set_state(LinkState::Connected);

        self.session = Some(session::spawn(
            stream,
            generation,
            &self.config.session,
            self.command_tx.clone(),
            self.events.clone(),
        ));
    }

    async fn dial_failed(&mut self, generation: u64) {
        let current = self.connector.as_ref().map(|c| c.generation);
        if current != Some(generation) {
            debug!(generation, "Ignoring stale dial failure");
            return;
        }
        self.connector = None;
        warn!(generation, "Dial failed");
        self.emit(Event::TransientFailure(DIAL_FAILED_REASON.to_string()));
        self.set_state(LinkState::Idle);
        self.restart_listening().await;
    }

    async fn session_read_failed(&mut self, generation: u64) {
        let current = self.session.as_ref().map(|s| s.generation);
        if current != Some(generation) {
            debug!(generation, "Ignoring stale session failure");
            return;
        }
        if let Some(session) = self.session.take() {
            session.cancel();
        }
        warn!(generation, "Session lost");
        self.emit(Event::TransientFailure(CONNECTION_LOST_REASON.to_string()));
        self.set_state(LinkState::Idle);
        self.restart_listening().await;
    }

    /// Re-enters listening mode after a recoverable failure. This runs on
    /// the same serialized command path as external commands, so it cannot
    /// interleave with a concurrent `stop` or `connect`.
    ///
    /// 可恢复失败后重新进入监听模式。它与外部命令走同一条串行化命令路径，
    /// 不会与并发的 `stop` 或 `connect` 交错。
    async fn restart_listening(&mut self) {
        if let Err(e) = self.start().await {
            error!(error = %e, "Unable to restart listener after failure");
        }
    }

    fn state(&self) -> LinkState {
        *self.state_tx.borrow()
    }

    fn set_state(&mut self, state: LinkState) {
        let _ = self.state_tx.send(state);
        self.emit(Event::StateChanged(state));
    }

    fn emit(&self, event: Event) {
        let _ = self.events.send(event);
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }
}
