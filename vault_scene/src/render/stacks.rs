use bevy::log::debug;
use bevy::prelude::*;

use crate::render::CoinRenderer;
use crate::scene::{Coin, CoinPalette, StackLayout};

#[derive(Clone, Debug)]
pub struct StackSettings {
    pub coin_radius: f32,
    pub coin_thickness: f32,
    /// Coins per column before starting the next one.
    pub coins_per_column: usize,
    /// Columns side by side within one symbol's lane.
    pub columns_across: usize,
    pub column_spacing: f32,
    pub lane_spacing: f32,
    /// Coins past this many are not drawn.
    pub max_coins_per_stack: usize,
    /// Centre of the first coin of lane 0, resting on the vault floor.
    pub origin: Vec3,
}

impl Default for StackSettings {
    fn default() -> Self {
        Self {
            coin_radius: 0.16,
            coin_thickness: 0.05,
            coins_per_column: 20,
            columns_across: 2,
            column_spacing: 0.4,
            lane_spacing: 1.0,
            max_coins_per_stack: 400,
            origin: Vec3::new(-2.5, 0.0, -1.0),
        }
    }
}

/// Coins stacked in columns, one lane per symbol.
#[derive(Default)]
pub struct StackedCoinsRenderer {
    pub settings: StackSettings,
}

impl CoinRenderer for StackedCoinsRenderer {
    fn spawn_stack(
        &self,
        commands: &mut Commands,
        meshes: &mut Assets<Mesh>,
        materials: &mut Assets<StandardMaterial>,
        palette: &mut CoinPalette,
        layout: &mut StackLayout,
        symbol: &str,
        counts: &[u32],
    ) -> Vec<Entity> {
        let settings = &self.settings;
        // A second batch of the same symbol continues the lane's stack.
        let room = settings
            .max_coins_per_stack
            .saturating_sub(layout.filled(symbol));
        let drawn = counts.len().min(room);
        if drawn < counts.len() {
            debug!(
                "vault: drawing {drawn} of {} {symbol} coins",
                counts.len()
            );
        }

        let (lane, start) = layout.reserve(symbol, drawn);
        let positions = coin_positions(start, drawn, lane, settings);
        let mesh = meshes.add(Cylinder::new(settings.coin_radius, settings.coin_thickness));
        let material = palette.material_for(symbol, materials);
        let full_value = counts.iter().copied().max().unwrap_or(1).max(1);

        counts
            .iter()
            .zip(positions)
            .map(|(&count, position)| {
                let scale = coin_scale(count, full_value);
                commands
                    .spawn((
                        Mesh3d(mesh.clone()),
                        MeshMaterial3d(material.clone()),
                        Transform::from_translation(position)
                            .with_scale(Vec3::new(scale, 1.0, scale)),
                        Coin {
                            symbol: symbol.to_string(),
                            count_per_coin: count,
                        },
                        Name::new(format!("{symbol} coin")),
                    ))
                    .id()
            })
            .collect()
    }
}

/// Radius scale for a coin worth `count` when a full coin is `full_value`:
/// partial coins shrink, down to half size.
fn coin_scale(count: u32, full_value: u32) -> f32 {
    let fraction = count as f32 / full_value as f32;
    fraction.sqrt().clamp(0.5, 1.0)
}

/// Centres of `count` coins in `lane`, starting at slot `start`. Columns fill
/// bottom-up, `columns_across` wide, then step back along -Z.
pub fn coin_positions(
    start: usize,
    count: usize,
    lane: usize,
    settings: &StackSettings,
) -> Vec<Vec3> {
    let per_column = settings.coins_per_column.max(1);
    let across = settings.columns_across.max(1);
    let lane_x = settings.origin.x + lane as f32 * settings.lane_spacing;

    (start..start + count)
        .map(|i| {
            let column = i / per_column;
            let level = i % per_column;
            let x = lane_x + (column % across) as f32 * settings.column_spacing;
            let z = settings.origin.z - (column / across) as f32 * settings.column_spacing;
            let y = settings.origin.y
                + settings.coin_thickness / 2.0
                + level as f32 * settings.coin_thickness;
            Vec3::new(x, y, z)
        })
        .collect()
}
