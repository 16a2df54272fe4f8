//! Vault state machine: validated host messages in, ordered scene commands out.
//!
//! The only durable state is whether the door has been opened and the last
//! accepted wallet update. Commands go to an injected [`CommandSink`]; the
//! orchestrator never touches the scene itself.

use bevy::log::{debug, info};
use bevy::prelude::Resource;

use crate::wallet::{self, CoinBatch, WalletUpdate};

/// Instructions for the presentation layer, applied in emission order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VaultCommand {
    /// Remove every spawned coin.
    Clear,
    /// Spawn one coin per entry of `counts`, each carrying that many units.
    SpawnBatch { symbol: String, counts: Vec<u32> },
    OpenDoor,
    CloseDoor,
}

/// Receiver of orchestrator output.
pub trait CommandSink {
    fn apply(&mut self, command: VaultCommand);
}

impl CommandSink for Vec<VaultCommand> {
    fn apply(&mut self, command: VaultCommand) {
        self.push(command);
    }
}

/// Sink used when no presentation layer is attached.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl CommandSink for NoopSink {
    fn apply(&mut self, _command: VaultCommand) {}
}

/// Door tracking plus the last accepted update for late subscribers.
///
/// Access goes through `ResMut`, which gives each message exclusive use of
/// the read-modify-write on `door_opened` and the command emission that
/// follows.
#[derive(Resource, Debug, Default)]
pub struct Orchestrator {
    door_opened: bool,
    last_update: Option<WalletUpdate>,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn door_opened(&self) -> bool {
        self.door_opened
    }

    /// Most recently accepted `setWallet` message, if any.
    pub fn last_update(&self) -> Option<&WalletUpdate> {
        self.last_update.as_ref()
    }

    /// Validate raw host text and act on it. Returns `false` when the payload
    /// was rejected; rejected payloads emit nothing and change nothing.
    pub fn handle_wallet_text(&mut self, raw: &str, sink: &mut impl CommandSink) -> bool {
        match wallet::parse(raw) {
            Some(update) => {
                self.handle_update(update, sink);
                true
            }
            None => false,
        }
    }

    /// Act on an already validated update and retain it for replay.
    pub fn handle_update(&mut self, update: WalletUpdate, sink: &mut impl CommandSink) {
        self.apply_update(&update, sink);
        self.last_update = Some(update);
    }

    /// Clear coins and close the door regardless of the current state.
    pub fn handle_reset(&mut self, sink: &mut impl CommandSink) {
        sink.apply(VaultCommand::Clear);
        sink.apply(VaultCommand::CloseDoor);
        if self.door_opened {
            info!("vault: door closed");
        }
        self.door_opened = false;
    }

    /// Re-emit the commands for the last accepted update, for a consumer
    /// that attached after it arrived. Returns `false` if there is nothing
    /// to replay.
    pub fn replay_last(&mut self, sink: &mut impl CommandSink) -> bool {
        let Some(update) = self.last_update.take() else {
            return false;
        };
        debug!("vault: replaying last wallet update");
        self.apply_update(&update, sink);
        self.last_update = Some(update);
        true
    }

    fn apply_update(&mut self, update: &WalletUpdate, sink: &mut impl CommandSink) {
        let batches: Vec<CoinBatch> = update.batches().filter(|b| !b.is_empty()).collect();

        if batches.is_empty() {
            sink.apply(VaultCommand::Clear);
            return;
        }

        if !self.door_opened {
            info!("vault: door opening");
            sink.apply(VaultCommand::OpenDoor);
            self.door_opened = true;
        }

        sink.apply(VaultCommand::Clear);
        for batch in batches {
            debug!(
                "vault: {} → {} coins of {}",
                batch.symbol, batch.coin_count, batch.divisor
            );
            sink.apply(VaultCommand::SpawnBatch {
                symbol: batch.symbol,
                counts: batch.counts_per_coin,
            });
        }
    }
}
