//! Coin renderer trait and the default stacked-coin implementation.

mod stacks;

use bevy::prelude::*;

use crate::scene::{CoinPalette, StackLayout};

pub use stacks::{coin_positions, StackSettings, StackedCoinsRenderer};

/// Turns one `SpawnBatch` command into scene entities.
pub trait CoinRenderer: Send + Sync + 'static {
    fn setup(&self, _app: &mut App) {}

    /// Spawn one entity per coin and return them, so a `Clear` later in the
    /// same frame can remove coins whose spawn commands haven't been applied.
    #[allow(clippy::too_many_arguments)]
    fn spawn_stack(
        &self,
        commands: &mut Commands,
        meshes: &mut Assets<Mesh>,
        materials: &mut Assets<StandardMaterial>,
        palette: &mut CoinPalette,
        layout: &mut StackLayout,
        symbol: &str,
        counts: &[u32],
    ) -> Vec<Entity>;
}

#[derive(Resource)]
pub struct RendererResource(pub Box<dyn CoinRenderer>);

impl RendererResource {
    pub fn new(renderer: impl CoinRenderer) -> Self {
        Self(Box::new(renderer))
    }
}
