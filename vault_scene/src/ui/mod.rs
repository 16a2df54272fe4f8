mod hud;
mod inspector;

pub use hud::{hud_plugin, HoldingRow, HudState};
pub use inspector::{inspector_plugin, SelectedCoin};
