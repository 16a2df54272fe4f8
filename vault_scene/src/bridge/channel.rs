//! Host transport: line-framed signals read on a dedicated thread and handed
//! to the ECS through a bounded channel.
//!
//! Framing is one signal per line. A line whose first word is `reset` is a
//! reset request (the rest of the line is ignored); any other non-blank line
//! is a wallet payload for the validator.

use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use bevy::log::{info, warn};
use crossbeam_channel::{Receiver, Sender};

use crate::bridge::TransportError;

const CHANNEL_CAPACITY: usize = 64;
const RESET_COMMAND: &str = "reset";

/// A framed inbound signal, not yet validated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InboundSignal {
    Wallet(String),
    Reset,
}

/// Bevy resource holding the receiving end of the host transport.
/// Drained by `ingest_host_messages`.
#[derive(bevy::prelude::Resource)]
pub struct HostChannel(pub Receiver<InboundSignal>);

/// Sending end of the host transport. Cloneable; embedding apps call these
/// directly instead of going through stdin.
#[derive(Clone, Debug)]
pub struct HostSender(Sender<InboundSignal>);

impl HostSender {
    /// Queue a raw wallet payload. Returns `false` once the app has shut down.
    pub fn send_wallet_json(&self, json: impl Into<String>) -> bool {
        self.0.send(InboundSignal::Wallet(json.into())).is_ok()
    }

    /// Queue a reset. The argument is accepted and ignored.
    pub fn request_reset(&self, _argument: &str) -> bool {
        self.0.send(InboundSignal::Reset).is_ok()
    }

    fn send(&self, signal: InboundSignal) -> bool {
        self.0.send(signal).is_ok()
    }
}

/// Create a connected sender/receiver pair.
pub fn host_channel() -> (HostSender, HostChannel) {
    let (tx, rx) = crossbeam_channel::bounded(CHANNEL_CAPACITY);
    (HostSender(tx), HostChannel(rx))
}

/// Turn one transport line into a signal; blank lines yield nothing.
pub fn frame_line(line: &str) -> Option<InboundSignal> {
    let trimmed = line.trim();
    let first_word = trimmed.split_whitespace().next()?;
    if first_word.eq_ignore_ascii_case(RESET_COMMAND) {
        Some(InboundSignal::Reset)
    } else {
        Some(InboundSignal::Wallet(trimmed.to_string()))
    }
}

/// Forward framed lines from `reader` to `sender` on a dedicated thread,
/// optionally pausing `delay` after each signal. Stops at end of input or
/// when the receiver is dropped.
pub fn spawn_reader<R>(reader: R, sender: HostSender, delay: Option<Duration>) -> JoinHandle<()>
where
    R: BufRead + Send + 'static,
{
    thread::spawn(move || {
        for line in reader.lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    warn!("vault: host transport read failed: {err}");
                    return;
                }
            };
            let Some(signal) = frame_line(&line) else {
                continue;
            };
            if !sender.send(signal) {
                return;
            }
            if let Some(delay) = delay {
                thread::sleep(delay);
            }
        }
        info!("vault: host transport reached end of input");
    })
}

/// Host channel fed from this process's stdin.
pub fn init_stdin_channel() -> HostChannel {
    let (sender, channel) = host_channel();
    spawn_stdin_reader(sender);
    channel
}

fn spawn_stdin_reader(sender: HostSender) -> JoinHandle<()> {
    spawn_reader(BufReader::new(std::io::stdin()), sender, None)
}

/// Host channel that replays a recorded session file, pausing `delay`
/// between signals to mimic a live host.
pub fn init_fixture_channel(path: &Path, delay: Duration) -> Result<HostChannel, TransportError> {
    let (sender, channel) = host_channel();
    spawn_fixture_reader(path, sender, delay)?;
    Ok(channel)
}

fn spawn_fixture_reader(
    path: &Path,
    sender: HostSender,
    delay: Duration,
) -> Result<JoinHandle<()>, TransportError> {
    let contents = std::fs::read_to_string(path).map_err(|source| TransportError::Fixture {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(spawn_reader(Cursor::new(contents), sender, Some(delay)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_reset_and_wallet_lines() {
        assert_eq!(frame_line("reset"), Some(InboundSignal::Reset));
        assert_eq!(frame_line("  RESET now please"), Some(InboundSignal::Reset));
        assert_eq!(
            frame_line(r#" {"type":"setWallet"} "#),
            Some(InboundSignal::Wallet(r#"{"type":"setWallet"}"#.to_string()))
        );
        assert_eq!(frame_line(""), None);
        assert_eq!(frame_line("   \t"), None);
    }

    #[test]
    fn reader_forwards_signals_in_order() {
        let input = "{\"type\":\"setWallet\"}\n\nreset\n{not json\n";
        let (sender, channel) = host_channel();

        spawn_reader(Cursor::new(input.to_string()), sender, None)
            .join()
            .unwrap();

        let signals: Vec<_> = channel.0.try_iter().collect();
        assert_eq!(
            signals,
            vec![
                InboundSignal::Wallet("{\"type\":\"setWallet\"}".to_string()),
                InboundSignal::Reset,
                InboundSignal::Wallet("{not json".to_string()),
            ]
        );
    }

    #[test]
    fn reader_stops_when_receiver_is_dropped() {
        let (sender, channel) = host_channel();
        drop(channel);
        let handle = spawn_reader(Cursor::new("reset\nreset\n".to_string()), sender, None);
        assert!(handle.join().is_ok());
    }

    #[test]
    fn sender_helpers_queue_signals() {
        let (sender, channel) = host_channel();
        assert!(sender.send_wallet_json("{}"));
        assert!(sender.request_reset("ignored"));
        assert_eq!(
            channel.0.try_recv().unwrap(),
            InboundSignal::Wallet("{}".to_string())
        );
        assert_eq!(channel.0.try_recv().unwrap(), InboundSignal::Reset);
    }

    #[test]
    fn missing_fixture_is_an_error() {
        let result = init_fixture_channel(
            Path::new("/definitely/not/here.jsonl"),
            Duration::from_millis(0),
        );
        assert!(matches!(result, Err(TransportError::Fixture { .. })));
    }
}
