//! Logging channel for the simulation core.
//!
//! The core reports recoverable faults (asset load failures, registry
//! invariant violations) through the `log` facade. [`ChannelLogger`] forwards
//! those records over a crossbeam channel so a host — the debug UI or the
//! headless app console — can drain and display them without the core knowing
//! anything about the presentation side.

mod channel;

pub use channel::{ChannelLogger, LogMessage};
