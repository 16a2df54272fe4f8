//! Minimal prelude for SDK consumers.

pub use crate::bridge::{host_channel, ChannelSink, HostSender, OutboundEvent, OutboundSink};
pub use crate::config::{vault_config, OutboundMode, VaultConfig};
pub use crate::orchestrator::{CommandSink, Orchestrator, VaultCommand};
pub use crate::render::{CoinRenderer, RendererResource, StackSettings, StackedCoinsRenderer};
pub use crate::sdk::{HostSource, VaultBuilder};
pub use crate::wallet::{compute, CoinBatch, WalletUpdate};
