//! HUD overlay: door state, holdings by symbol, FPS counter.

use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPlugin};

use crate::orchestrator::{Orchestrator, VaultCommand};
use crate::scene::symbol_color;

/// One row of the holdings table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoldingRow {
    pub symbol: String,
    pub coins: usize,
    pub units: u64,
}

/// Live HUD state, updated from every applied vault command.
#[derive(Resource, Default, Debug)]
pub struct HudState {
    pub door_open: bool,
    pub holdings: Vec<HoldingRow>,
    pub commands_applied: u64,
    pub deposits: u64,
    /// Symbol and units of the last coin the user clicked.
    pub last_selection: Option<(String, u32)>,
}

impl HudState {
    pub fn record_command(&mut self, command: &VaultCommand) {
        self.commands_applied += 1;
        match command {
            VaultCommand::Clear => self.holdings.clear(),
            VaultCommand::SpawnBatch { symbol, counts } => {
                self.deposits += 1;
                self.holdings.push(HoldingRow {
                    symbol: symbol.clone(),
                    coins: counts.len(),
                    units: counts.iter().map(|&c| u64::from(c)).sum(),
                });
            }
            VaultCommand::OpenDoor => self.door_open = true,
            VaultCommand::CloseDoor => {
                self.door_open = false;
                self.last_selection = None;
            }
        }
    }

    pub fn total_coins(&self) -> usize {
        self.holdings.iter().map(|row| row.coins).sum()
    }
}

pub fn hud_plugin(app: &mut App) {
    app.add_plugins(EguiPlugin)
        .add_plugins(FrameTimeDiagnosticsPlugin)
        .init_resource::<HudState>()
        .add_systems(Startup, sync_door_state)
        .add_systems(Update, hud_overlay_system);
}

/// A wallet applied before startup opens the door without a command.
fn sync_door_state(mut hud: ResMut<HudState>, orchestrator: Option<Res<Orchestrator>>) {
    if let Some(orchestrator) = orchestrator {
        hud.door_open = orchestrator.door_opened();
    }
}

fn hud_overlay_system(
    mut contexts: EguiContexts,
    hud: Res<HudState>,
    diagnostics: Res<DiagnosticsStore>,
) {
    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|d| d.smoothed())
        .unwrap_or(0.0);

    egui::Window::new("Coin Vault")
        .anchor(egui::Align2::LEFT_TOP, [10.0, 10.0])
        .resizable(false)
        .collapsible(false)
        .title_bar(false)
        .frame(
            egui::Frame::default()
                .fill(egui::Color32::from_rgba_premultiplied(20, 16, 10, 210))
                .inner_margin(egui::Margin::same(12))
                .corner_radius(egui::CornerRadius::same(6)),
        )
        .show(contexts.ctx_mut(), |ui| {
            ui.style_mut().override_text_style = Some(egui::TextStyle::Monospace);
            ui.visuals_mut().override_text_color = Some(egui::Color32::from_rgb(230, 220, 200));

            let (door_text, door_color) = if hud.door_open {
                ("Door open", egui::Color32::from_rgb(120, 220, 140))
            } else {
                ("Door sealed", egui::Color32::from_rgb(220, 160, 90))
            };
            ui.label(egui::RichText::new(door_text).size(16.0).color(door_color));
            ui.add_space(4.0);

            if hud.holdings.is_empty() {
                ui.label("Vault empty");
            }
            for row in &hud.holdings {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("●").color(egui_color(symbol_color(&row.symbol))));
                    ui.label(format!(
                        "{:<6} {:>4} coins  {}",
                        row.symbol,
                        row.coins,
                        format_units(row.units)
                    ));
                });
            }
            ui.add_space(4.0);

            if let Some((symbol, units)) = &hud.last_selection {
                ui.label(format!("Selected  {symbol} x{units}"));
            }

            ui.separator();
            ui.label(format!("Coins      {}", hud.total_coins()));
            ui.label(format!("Deposits   {}", hud.deposits));
            ui.label(format!("FPS  {fps:.0}"));
        });
}

fn egui_color(color: Color) -> egui::Color32 {
    let srgba = color.to_srgba();
    egui::Color32::from_rgb(
        (srgba.red * 255.0) as u8,
        (srgba.green * 255.0) as u8,
        (srgba.blue * 255.0) as u8,
    )
}

fn format_units(units: u64) -> String {
    if units >= 1_000_000 {
        format!("{:.1}M", units as f64 / 1_000_000.0)
    } else if units >= 1_000 {
        format!("{:.1}K", units as f64 / 1_000.0)
    } else {
        units.to_string()
    }
}
