//! Events sent back to the host.

use std::io::Write;

use bevy::log::{error, info};
use bevy::prelude::Resource;
use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};

use crate::bridge::BridgeError;

/// Payloads the vault posts to its host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutboundEvent {
    #[serde(rename = "coinSelected")]
    CoinSelected { symbol: String, count_per_coin: i64 },
}

/// Build a coin selection event. A blank symbol produces no event; a
/// negative count is clamped to zero.
pub fn build_selection_event(symbol: &str, count_per_coin: i64) -> Option<OutboundEvent> {
    if symbol.trim().is_empty() {
        return None;
    }
    Some(OutboundEvent::CoinSelected {
        symbol: symbol.to_string(),
        count_per_coin: count_per_coin.max(0),
    })
}

/// One-way delivery of serialized payloads to the host.
pub trait OutboundSink: Send + Sync + 'static {
    fn deliver(&self, payload: &str) -> Result<(), BridgeError>;
}

/// Writes one JSON object per line to stdout.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdoutSink;

impl OutboundSink for StdoutSink {
    fn deliver(&self, payload: &str) -> Result<(), BridgeError> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{payload}")?;
        out.flush()?;
        Ok(())
    }
}

/// Logs payloads instead of sending them; for running without a host.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl OutboundSink for LogSink {
    fn deliver(&self, payload: &str) -> Result<(), BridgeError> {
        info!("vault: would post to host: {payload}");
        Ok(())
    }
}

/// Forwards payloads onto a channel, for embedding apps and tests.
#[derive(Clone, Debug)]
pub struct ChannelSink(pub Sender<String>);

impl OutboundSink for ChannelSink {
    fn deliver(&self, payload: &str) -> Result<(), BridgeError> {
        self.0
            .send(payload.to_string())
            .map_err(|_| BridgeError::Disconnected)
    }
}

/// Bevy resource holding the active outbound sink.
#[derive(Resource)]
pub struct OutboundBridge(pub Box<dyn OutboundSink>);

impl OutboundBridge {
    pub fn new(sink: impl OutboundSink) -> Self {
        Self(Box::new(sink))
    }

    /// Serialize and deliver `event`. Failures are logged and dropped.
    pub fn post(&self, event: &OutboundEvent) -> bool {
        match send_event(self.0.as_ref(), event) {
            Ok(()) => true,
            Err(err) => {
                error!("vault: failed to post {event:?}: {err}");
                false
            }
        }
    }

    /// Post a `coinSelected` event; blank symbols are a silent no-op.
    pub fn post_coin_selection(&self, symbol: &str, count_per_coin: i64) -> bool {
        match build_selection_event(symbol, count_per_coin) {
            Some(event) => self.post(&event),
            None => false,
        }
    }
}

fn send_event(sink: &dyn OutboundSink, event: &OutboundEvent) -> Result<(), BridgeError> {
    let json = serde_json::to_string(event)?;
    sink.deliver(&json)
}
