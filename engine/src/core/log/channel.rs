use crossbeam::channel::{Receiver, Sender, unbounded};
use log::{Level, Metadata, Record};

/// A single rendered log record as delivered to the channel consumer.
#[derive(Debug)]
pub struct LogMessage {
    pub level: Level,
    pub message: String,
}

/// A `log::Log` implementation that forwards records over a channel.
///
/// Dropped receivers simply discard messages; logging never blocks the
/// simulation thread.
pub struct ChannelLogger {
    sender: Sender<LogMessage>,
}

impl log::Log for ChannelLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Info
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let _ = self.sender.try_send(LogMessage {
                level: record.metadata().level(),
                message: format!("{}", record.args()),
            });
        }
    }

    fn flush(&self) {}
}

impl ChannelLogger {
    pub fn new(sender: Sender<LogMessage>) -> Self {
        Self { sender }
    }

    /// Construct a logger together with the receiving end of its channel.
    pub fn with_receiver() -> (Self, Receiver<LogMessage>) {
        let (sender, receiver) = unbounded();
        (Self::new(sender), receiver)
    }
}
