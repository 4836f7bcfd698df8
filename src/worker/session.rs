//! The active-session worker: owns the single connected byte stream.
//!
//! The stream is split into a read half driving a read loop and a write half
//! draining an outbound queue. Write failures are reported but never tear the
//! session down on their own; only the read side (or the orchestrator) ends a
//! session.
//!
//! 活动会话工作任务：拥有唯一一条已连接的字节流。
//!
//! 流被拆分为驱动读取循环的读半部和排空出站队列的写半部。写失败只上报，
//! 不会自行终止会话；只有读取侧（或编排器）才能结束会话。

use crate::config::SessionConfig;
use crate::event::Event;
use crate::link::command::LinkCommand;
use crate::transport::Transport;
use bytes::Bytes;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

/// Reason reported when a payload cannot be written out.
/// 负载无法写出时上报的原因。
pub(crate) const WRITE_FAILED_REASON: &str = "Unable to send data";

/// A handle to a running session. Cancelling (or dropping) it stops both the
/// read loop and the write half, releasing the stream. Payloads still queued
/// at that point are dropped, not flushed: once the session is cancelled no
/// further data event may reach the consumer.
///
/// 正在运行的会话的句柄。取消（或丢弃）它会停止读取循环和写半部，
/// 释放整条流。此时仍在队列中的负载被丢弃而非刷出：会话一旦取消，
/// 不得再有数据事件到达消费者。
pub(crate) struct SessionHandle {
    pub(crate) generation: u64,
    outbound_tx: mpsc::Sender<Bytes>,
    cancel_tx: watch::Sender<()>,
}

impl SessionHandle {
    pub(crate) fn cancel(self) {
        let _ = self.cancel_tx.send(());
    }

    /// Queues a payload for the write half without blocking the caller.
    /// 在不阻塞调用方的前提下将负载排入写半部的队列。
    pub(crate) fn try_send(
        &self,
        payload: Bytes,
    ) -> Result<(), mpsc::error::TrySendError<Bytes>> {
        self.outbound_tx.try_send(payload)
    }
}

pub(crate) fn spawn<T: Transport>(
    stream: T::Stream,
    generation: u64,
    config: &SessionConfig,
    command_tx: mpsc::WeakSender<LinkCommand<T>>,
    events: mpsc::UnboundedSender<Event>,
) -> SessionHandle {
    let (cancel_tx, cancel_rx) = watch::channel(());
    let (outbound_tx, mut outbound_rx) =
        mpsc::channel::<Bytes>(config.outbound_queue_capacity);
    let (mut reader, mut writer) = tokio::io::split(stream);

    let mut read_cancel = cancel_rx.clone();
    let mut write_cancel = cancel_rx;

    let read_buffer_size = config.read_buffer_size;
    let read_events = events.clone();
    tokio::spawn(async move {
        let mut buf = vec![0u8; read_buffer_size];
        loop {
            let read = tokio::select! {
                biased;
                _ = read_cancel.changed() => {
                    debug!(generation, "Session read loop cancelled");
                    return;
                }
                res = reader.read(&mut buf) => res,
            };
            match read {
                Ok(0) => {
                    debug!(generation, "Peer closed the stream");
                    break;
                }
                Ok(n) => {
                    let _ = read_events.send(Event::DataReceived(Bytes::copy_from_slice(&buf[..n])));
                }
                Err(e) => {
                    debug!(generation, error = %e, "Session read failed");
                    break;
                }
            }
        }
        // Reported exactly once; the loop never retries a broken stream.
        if let Some(tx) = command_tx.upgrade() {
            let _ = tx
                .send(LinkCommand::SessionReadFailed { generation })
                .await;
        }
    });

    // The cancel arm is checked first in both selects, so a cancelled write
    // half neither drains what is still queued nor reports an in-flight
    // write, and no event can trail the teardown.
    // 两个 select 都优先检查取消分支，被取消的写半部既不排空剩余队列，
    // 也不上报进行中的写入，不会有事件拖在拆除之后。
    tokio::spawn(async move {
        loop {
            let payload = tokio::select! {
                biased;
                _ = write_cancel.changed() => {
                    debug!(generation, "Session write loop cancelled");
                    break;
                }
                next = outbound_rx.recv() => match next {
                    Some(payload) => payload,
                    None => break,
                },
            };
            tokio::select! {
                biased;
                _ = write_cancel.changed() => {
                    debug!(generation, "Session write loop cancelled");
                    break;
                }
                res = writer.write_all(&payload) => match res {
                    Ok(()) => {
                        let _ = events.send(Event::DataSent(payload));
                    }
                    Err(e) => {
                        warn!(generation, error = %e, "Session write failed");
                        let _ = events.send(Event::TransientFailure(
                            WRITE_FAILED_REASON.to_string(),
                        ));
                    }
                },
            }
        }
    });

    SessionHandle {
        generation,
        outbound_tx,
        cancel_tx,
    }
}
