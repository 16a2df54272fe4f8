//! Coin and vault materials. Coins share one material per symbol.

use std::collections::HashMap;

use bevy::prelude::*;

/// Brand-ish tints for common tokens; everything else hashes to a hue.
const KNOWN_TOKENS: &[(&str, [f32; 3])] = &[
    ("BTC", [0.97, 0.58, 0.10]),
    ("ETH", [0.45, 0.52, 0.85]),
    ("USDC", [0.16, 0.46, 0.79]),
    ("USDT", [0.15, 0.63, 0.48]),
    ("SOL", [0.60, 0.27, 1.00]),
    ("DOGE", [0.76, 0.65, 0.30]),
    ("DOT", [0.90, 0.00, 0.48]),
];

/// Base colour for a canonical symbol. Deterministic across runs.
pub fn symbol_color(symbol: &str) -> Color {
    if let Some((_, [r, g, b])) = KNOWN_TOKENS.iter().find(|(known, _)| *known == symbol) {
        return Color::srgb(*r, *g, *b);
    }
    let hue = (fnv1a(symbol) % 360) as f32;
    Color::hsl(hue, 0.65, 0.5)
}

// FNV-1a, so colours don't depend on the std hasher's seed.
fn fnv1a(text: &str) -> u32 {
    text.bytes().fold(0x811c_9dc5, |hash, byte| {
        (hash ^ u32::from(byte)).wrapping_mul(0x0100_0193)
    })
}

/// Per-symbol coin material cache.
#[derive(Resource, Default)]
pub struct CoinPalette {
    materials: HashMap<String, Handle<StandardMaterial>>,
}

impl CoinPalette {
    pub fn material_for(
        &mut self,
        symbol: &str,
        materials: &mut Assets<StandardMaterial>,
    ) -> Handle<StandardMaterial> {
        self.materials
            .entry(symbol.to_string())
            .or_insert_with(|| {
                materials.add(StandardMaterial {
                    base_color: symbol_color(symbol),
                    metallic: 0.9,
                    perceptual_roughness: 0.3,
                    ..default()
                })
            })
            .clone()
    }
}

pub fn vault_wall_material(materials: &mut Assets<StandardMaterial>) -> Handle<StandardMaterial> {
    materials.add(StandardMaterial {
        base_color: Color::srgb(0.22, 0.23, 0.26),
        perceptual_roughness: 0.8,
        ..default()
    })
}

pub fn vault_door_material(materials: &mut Assets<StandardMaterial>) -> Handle<StandardMaterial> {
    materials.add(StandardMaterial {
        base_color: Color::srgb(0.55, 0.57, 0.6),
        metallic: 0.8,
        perceptual_roughness: 0.35,
        ..default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_are_stable_per_symbol() {
        assert_eq!(symbol_color("PEPE"), symbol_color("PEPE"));
        assert_eq!(symbol_color("BTC"), Color::srgb(0.97, 0.58, 0.10));
    }

    #[test]
    fn palette_reuses_materials() {
        let mut materials = Assets::<StandardMaterial>::default();
        let mut palette = CoinPalette::default();

        let first = palette.material_for("ETH", &mut materials);
        let again = palette.material_for("ETH", &mut materials);
        let other = palette.material_for("BTC", &mut materials);

        assert_eq!(first, again);
        assert_ne!(first, other);
        assert_eq!(materials.len(), 2);
    }
}
