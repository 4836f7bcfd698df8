//! The listener worker: owns one listening endpoint and accepts inbound
//! connections until cancelled or a session is promoted.
//!
//! 监听工作任务：拥有一个监听端点，接受入站连接，直到被取消或会话被提升。

use crate::event::LinkState;
use crate::link::command::LinkCommand;
use crate::transport::{ListeningEndpoint, Transport};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::debug;

/// A handle to a running listener task. Cancelling (or dropping) it closes
/// the listening endpoint, unblocking any pending accept.
///
/// 正在运行的监听任务的句柄。取消（或丢弃）它会关闭监听端点，
/// 从而解除挂起的 accept。
pub(crate) struct ListenerHandle {
    cancel_tx: oneshot::Sender<()>,
}

impl ListenerHandle {
    pub(crate) fn cancel(self) {
        let _ = self.cancel_tx.send(());
    }
}

/// Spawns the accept loop over an already-bound endpoint. Binding happens in
/// the orchestrator so that a bind failure surfaces from `start` instead of
/// being lost inside a task.
///
/// 在已绑定的端点上启动 accept 循环。绑定在编排器中完成，
/// 这样绑定失败能从 `start` 返回，而不是消失在任务内部。
pub(crate) fn spawn<T: Transport>(
    mut endpoint: T::Listener,
    state_rx: watch::Receiver<LinkState>,
    command_tx: mpsc::WeakSender<LinkCommand<T>>,
) -> ListenerHandle {
    let (cancel_tx, mut cancel_rx) = oneshot::channel();

    tokio::spawn(async move {
        loop {
            let accepted = tokio::select! {
                _ = &mut cancel_rx => break,
                res = endpoint.accept() => res,
            };
            match accepted {
                Ok((stream, peer)) => {
                    // Advisory pre-check only: the authoritative duplicate
                    // discard is the orchestrator's promotion tie-break.
                    if *state_rx.borrow() == LinkState::Connected {
                        debug!(peer = %peer.name, "Session already active, closing accepted stream");
                        drop(stream);
                        continue;
                    }
                    let Some(tx) = command_tx.upgrade() else { break };
                    if tx
                        .send(LinkCommand::InboundAccepted { stream, peer })
                        .await
                        .is_err()
                    {
                        break;
                    }
                }
                Err(e) => {
                    // The endpoint was closed under us. Clean exit, not a
                    // reportable failure.
                    debug!(error = %e, "Accept failed, listener exiting");
                    break;
                }
            }
        }
    });

    ListenerHandle { cancel_tx }
}
