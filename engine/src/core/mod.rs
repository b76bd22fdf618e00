//! Engine-level support services: frame timing and the logging channel.

pub mod log;
pub mod time;
