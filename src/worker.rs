//! The worker tasks owned by the link orchestrator.
//!
//! Each worker is a spawned tokio task owning exactly one transport resource,
//! paired with a handle kept by the orchestrator. Cancelling (or dropping)
//! the handle fires the worker's cancellation arm, which aborts any pending
//! accept/dial/read and drops the owned resource. A cancelled worker never
//! drives further orchestrator transitions: late completions carry the
//! worker's generation and are discarded when it no longer matches.
//!
//! 链路编排器所拥有的工作任务。
//!
//! 每个工作任务都是一个 tokio 任务，恰好拥有一份传输资源，并配有编排器持有
//! 的句柄。取消（或丢弃）句柄会触发任务的取消分支，中止挂起的
//! accept/dial/read 并释放资源。被取消的工作任务不会再驱动编排器的状态转换：
//! 迟到的完成结果携带任务的代号（generation），不匹配时会被丢弃。

pub(crate) mod connector;
pub(crate) mod listener;
pub(crate) mod session;
