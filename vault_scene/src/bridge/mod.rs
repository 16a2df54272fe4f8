//! Host bridge: inbound transport and outbound event contract.

mod channel;
pub mod outbound;

use std::path::PathBuf;

use thiserror::Error;

pub use channel::{
    frame_line, host_channel, init_fixture_channel, init_stdin_channel, spawn_reader, HostChannel,
    HostSender, InboundSignal,
};
pub use outbound::{
    build_selection_event, ChannelSink, LogSink, OutboundBridge, OutboundEvent, OutboundSink,
    StdoutSink,
};

/// Outbound delivery failures. Always logged and dropped by the caller.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write payload: {0}")]
    Io(#[from] std::io::Error),
    #[error("host channel disconnected")]
    Disconnected,
}

/// Inbound transport setup failures.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to read fixture {}: {source}", path.display())]
    Fixture {
        path: PathBuf,
        source: std::io::Error,
    },
}
