//! Coin vault: wallet balances rendered as stacks of coins behind a vault door.
//!
//! Library root: wallet math, orchestrator, host bridge, config, and the Bevy
//! presentation layer behind the SDK builder.

mod camera;
pub mod bridge;
pub mod config;
pub mod orchestrator;
pub mod render;
pub mod scene;
mod ui;
pub mod wallet;

pub mod prelude;
pub mod sdk;

pub use camera::{orbit_camera_plugin, OrbitCamera};
pub use orchestrator::{CommandSink, NoopSink, Orchestrator, VaultCommand};
pub use ui::{hud_plugin, inspector_plugin, HoldingRow, HudState, SelectedCoin};
pub use wallet::{CoinBatch, WalletUpdate};
