//! The connector worker: owns one outbound dial attempt.
//!
//! 拨号工作任务：拥有一次出站拨号尝试。

use crate::link::command::LinkCommand;
use crate::transport::{ServiceId, Transport};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

/// A handle to an in-flight dial. Cancelling (or dropping) it abandons the
/// dial mid-flight and closes the half-open socket.
///
/// 进行中拨号的句柄。取消（或丢弃）它会放弃拨号并关闭半开的套接字。
pub(crate) struct ConnectorHandle {
    pub(crate) generation: u64,
    cancel_tx: oneshot::Sender<()>,
}

impl ConnectorHandle {
    pub(crate) fn cancel(self) {
        let _ = self.cancel_tx.send(());
    }
}

pub(crate) fn spawn<T: Transport>(
    transport: Arc<T>,
    peer: T::Addr,
    service: ServiceId,
    generation: u64,
    command_tx: mpsc::WeakSender<LinkCommand<T>>,
) -> ConnectorHandle {
    let (cancel_tx, mut cancel_rx) = oneshot::channel();

    tokio::spawn(async move {
        let dialed = tokio::select! {
            _ = &mut cancel_rx => {
                // Teardown was intentional; no failure is reported.
                debug!(generation, "Dial cancelled");
                return;
            }
            res = transport.dial(&peer, &service) => res,
        };
        let command = match dialed {
            Ok((stream, info)) => {
                debug!(generation, peer = %info.name, "Dial succeeded");
                LinkCommand::DialSucceeded {
                    generation,
                    stream,
                    peer: info,
                }
            }
            Err(e) => {
                debug!(generation, error = %e, "Dial failed");
                LinkCommand::DialFailed { generation }
            }
        };
        if let Some(tx) = command_tx.upgrade() {
            let _ = tx.send(command).await;
        }
    });

    ConnectorHandle {
        generation,
        cancel_tx,
    }
}
