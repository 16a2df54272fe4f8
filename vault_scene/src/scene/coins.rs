//! Coin entities and the systems that feed host messages through the
//! orchestrator into the scene.

use bevy::log::debug;
use bevy::prelude::*;

use crate::bridge::{HostChannel, InboundSignal};
use crate::orchestrator::{CommandSink, Orchestrator, VaultCommand};
use crate::render::RendererResource;
use crate::scene::materials::CoinPalette;
use crate::scene::vault::VaultDoor;
use crate::ui::HudState;

const MAX_MESSAGES_PER_FRAME: usize = 8;

/// A spawned coin and the units it stands for.
#[derive(Component, Clone, Debug)]
pub struct Coin {
    pub symbol: String,
    pub count_per_coin: u32,
}

/// Lane assignment for coin stacks, with the slots used in each lane.
/// Reset on every clear.
#[derive(Resource, Default)]
pub struct StackLayout {
    lanes: Vec<(String, usize)>,
}

impl StackLayout {
    /// Lane index for `symbol`, assigning the next free lane on first use.
    pub fn lane_for(&mut self, symbol: &str) -> usize {
        if let Some(index) = self.lanes.iter().position(|(lane, _)| lane == symbol) {
            return index;
        }
        self.lanes.push((symbol.to_string(), 0));
        self.lanes.len() - 1
    }

    /// Slots already taken in `symbol`'s lane.
    pub fn filled(&self, symbol: &str) -> usize {
        self.lanes
            .iter()
            .find(|(lane, _)| lane == symbol)
            .map_or(0, |(_, filled)| *filled)
    }

    /// Take `count` slots in `symbol`'s lane. Returns the lane and the first
    /// slot taken.
    pub fn reserve(&mut self, symbol: &str, count: usize) -> (usize, usize) {
        let lane = self.lane_for(symbol);
        let (_, filled) = &mut self.lanes[lane];
        let start = *filled;
        *filled += count;
        (lane, start)
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    pub fn reset(&mut self) {
        self.lanes.clear();
    }
}

/// Orchestrator output waiting to be applied this frame, in order.
#[derive(Resource, Default, Debug)]
pub struct PendingCommands(pub Vec<VaultCommand>);

impl CommandSink for PendingCommands {
    fn apply(&mut self, command: VaultCommand) {
        self.0.push(command);
    }
}

/// Drains the host channel into the orchestrator.
pub fn ingest_host_messages(
    channel: Option<Res<HostChannel>>,
    mut orchestrator: ResMut<Orchestrator>,
    mut pending: ResMut<PendingCommands>,
) {
    let Some(channel) = channel else {
        return;
    };
    for signal in channel.0.try_iter().take(MAX_MESSAGES_PER_FRAME) {
        match signal {
            InboundSignal::Wallet(raw) => {
                orchestrator.handle_wallet_text(&raw, &mut *pending);
            }
            InboundSignal::Reset => orchestrator.handle_reset(&mut *pending),
        }
    }
}

/// A renderer attached after updates already arrived gets the last one again.
pub fn replay_for_late_renderer(
    mut orchestrator: ResMut<Orchestrator>,
    mut pending: ResMut<PendingCommands>,
) {
    orchestrator.replay_last(&mut *pending);
}

/// Applies pending commands to the scene. Without a renderer, spawns are
/// dropped; the orchestrator's state is unaffected either way.
#[allow(clippy::too_many_arguments)]
pub fn apply_vault_commands(
    mut commands: Commands,
    mut pending: ResMut<PendingCommands>,
    renderer: Option<Res<RendererResource>>,
    mut layout: ResMut<StackLayout>,
    mut palette: ResMut<CoinPalette>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    coins: Query<Entity, With<Coin>>,
    mut doors: Query<&mut VaultDoor>,
    mut hud: Option<ResMut<HudState>>,
) {
    if pending.0.is_empty() {
        return;
    }

    // Coins spawned by earlier commands this frame are not visible to `coins` yet.
    let mut spawned_this_frame: Vec<Entity> = Vec::new();
    let mut existing_cleared = false;

    for command in std::mem::take(&mut pending.0) {
        if let Some(hud) = hud.as_mut() {
            hud.record_command(&command);
        }
        match command {
            VaultCommand::Clear => {
                if !existing_cleared {
                    for entity in &coins {
                        commands.entity(entity).despawn_recursive();
                    }
                    existing_cleared = true;
                }
                for entity in spawned_this_frame.drain(..) {
                    commands.entity(entity).despawn_recursive();
                }
                layout.reset();
            }
            VaultCommand::SpawnBatch { symbol, counts } => {
                let Some(renderer) = renderer.as_ref() else {
                    debug!("vault: no renderer attached, dropping {symbol} stack");
                    continue;
                };
                spawned_this_frame.extend(renderer.0.spawn_stack(
                    &mut commands,
                    &mut meshes,
                    &mut materials,
                    &mut palette,
                    &mut layout,
                    &symbol,
                    &counts,
                ));
            }
            VaultCommand::OpenDoor => {
                for mut door in &mut doors {
                    door.open();
                }
            }
            VaultCommand::CloseDoor => {
                for mut door in &mut doors {
                    door.close();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lanes_are_assigned_in_first_use_order() {
        let mut layout = StackLayout::default();
        assert_eq!(layout.lane_for("BTC"), 0);
        assert_eq!(layout.lane_for("ETH"), 1);
        assert_eq!(layout.lane_for("BTC"), 0);
        assert_eq!(layout.lane_count(), 2);

        layout.reset();
        assert_eq!(layout.lane_for("ETH"), 0);
    }

    #[test]
    fn reserving_twice_continues_the_lane() {
        let mut layout = StackLayout::default();
        assert_eq!(layout.reserve("BTC", 3), (0, 0));
        assert_eq!(layout.reserve("ETH", 2), (1, 0));
        assert_eq!(layout.reserve("BTC", 4), (0, 3));
        assert_eq!(layout.filled("BTC"), 7);
        assert_eq!(layout.filled("SOL"), 0);

        layout.reset();
        assert_eq!(layout.filled("BTC"), 0);
    }

    #[test]
    fn pending_commands_keep_emission_order() {
        let mut orchestrator = Orchestrator::new();
        let mut pending = PendingCommands::default();

        orchestrator.handle_wallet_text(
            r#"{"type":"setWallet","balances":[{"symbol":"eth","amount":2}]}"#,
            &mut pending,
        );
        orchestrator.handle_reset(&mut pending);

        assert_eq!(
            pending.0,
            vec![
                VaultCommand::OpenDoor,
                VaultCommand::Clear,
                VaultCommand::SpawnBatch {
                    symbol: "ETH".into(),
                    counts: vec![1, 1],
                },
                VaultCommand::Clear,
                VaultCommand::CloseDoor,
            ]
        );
    }
}
