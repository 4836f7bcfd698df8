#![deny(clippy::expect_used, clippy::unwrap_used)]

//! The root of the single-session peer link library.
//! 单会话对等链路库的根。

pub mod config;
pub mod error;
pub mod event;
pub mod link;
pub mod transport;

mod worker;
