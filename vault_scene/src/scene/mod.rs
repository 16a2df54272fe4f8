pub(crate) mod coins;
pub(crate) mod materials;
pub(crate) mod vault;

use bevy::prelude::*;

use crate::orchestrator::Orchestrator;
use crate::render::RendererResource;

pub use coins::{
    apply_vault_commands, ingest_host_messages, replay_for_late_renderer, Coin, PendingCommands,
    StackLayout,
};
pub use materials::{symbol_color, CoinPalette};
pub use vault::{animate_door_system, setup_scene, step_door_angle, DoorSettings, VaultDoor};

/// Vault room, door, and the host-message pipeline that fills it with coins.
pub fn vault_plugin(app: &mut App) {
    app.init_resource::<Orchestrator>()
        .init_resource::<PendingCommands>()
        .init_resource::<StackLayout>()
        .init_resource::<CoinPalette>()
        .init_resource::<DoorSettings>()
        .add_systems(Startup, setup_scene)
        .add_systems(
            Update,
            (
                replay_for_late_renderer.run_if(resource_added::<RendererResource>),
                ingest_host_messages,
                apply_vault_commands,
                animate_door_system,
            )
                .chain(),
        );
}
