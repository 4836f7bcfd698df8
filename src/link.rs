//! The link-level API: the orchestrator actor, its commands, and the
//! user-facing handle.
//! 链路层 API：编排器 actor、其命令以及面向用户的句柄。

pub(crate) mod command;
mod event_loop;
pub mod handle;

pub use handle::{Link, LinkEvents};
