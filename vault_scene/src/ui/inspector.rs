//! Coin inspector: click a coin to highlight it, show its value, and report
//! the selection to the host.
//!
//! Uses manual ray-AABB intersection instead of Bevy's mesh picking to avoid
//! input absorption conflicts with bevy_egui.

use bevy::prelude::*;
use bevy::render::primitives::Aabb;
use bevy_egui::{egui, EguiContexts};

use crate::bridge::OutboundBridge;
use crate::scene::{symbol_color, Coin};
use crate::ui::HudState;

/// Tracks which coin is selected and its original material for highlight restore.
#[derive(Resource, Default)]
pub struct SelectedCoin {
    pub entity: Option<Entity>,
    original_material: Option<Handle<StandardMaterial>>,
}

pub fn inspector_plugin(app: &mut App) {
    app.init_resource::<SelectedCoin>().add_systems(
        Update,
        (
            click_raycast_system,
            forget_despawned_selection,
            inspector_panel_system,
            dismiss_selection_system,
        ),
    );
}

#[allow(clippy::too_many_arguments)]
fn click_raycast_system(
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    mut contexts: EguiContexts,
    coins: Query<(Entity, &GlobalTransform, &Aabb, &Coin)>,
    material_query: Query<&MeshMaterial3d<StandardMaterial>>,
    mut selected: ResMut<SelectedCoin>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    outbound: Option<Res<OutboundBridge>>,
    mut hud: Option<ResMut<HudState>>,
    mut commands: Commands,
) {
    if !mouse.just_pressed(MouseButton::Left) {
        return;
    }

    if contexts.ctx_mut().is_pointer_over_area() {
        return;
    }

    let Ok(window) = windows.get_single() else {
        return;
    };
    let Some(cursor_pos) = window.cursor_position() else {
        return;
    };
    let Ok((camera, cam_transform)) = cameras.get_single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(cam_transform, cursor_pos) else {
        return;
    };

    let ray_origin = ray.origin;
    let ray_dir: Vec3 = *ray.direction;

    let mut best_hit: Option<(Entity, f32, &Coin)> = None;
    for (entity, transform, aabb, coin) in &coins {
        if let Some(dist) = ray_aabb_test(ray_origin, ray_dir, transform, aabb) {
            if best_hit.is_none_or(|(_, d, _)| dist < d) {
                best_hit = Some((entity, dist, coin));
            }
        }
    }

    let Some((hit_entity, _, coin)) = best_hit else {
        return;
    };
    let Ok(current_material) = material_query.get(hit_entity) else {
        return;
    };

    select_entity(
        hit_entity,
        &mut commands,
        current_material,
        &mut selected,
        &mut materials,
    );
    report_selection(coin, outbound.as_deref(), hud.as_deref_mut());
}

/// Every click is reported, including repeat clicks on the selected coin.
fn report_selection(coin: &Coin, outbound: Option<&OutboundBridge>, hud: Option<&mut HudState>) {
    if let Some(outbound) = outbound {
        outbound.post_coin_selection(&coin.symbol, i64::from(coin.count_per_coin));
    }
    if let Some(hud) = hud {
        hud.last_selection = Some((coin.symbol.clone(), coin.count_per_coin));
    }
}

fn ray_aabb_test(
    ray_origin: Vec3,
    ray_dir: Vec3,
    transform: &GlobalTransform,
    aabb: &Aabb,
) -> Option<f32> {
    // Coins are scaled discs; scale the local box before offsetting.
    let (scale, _, translation) = transform.to_scale_rotation_translation();
    let center = translation + Vec3::from(aabb.center) * scale;
    let half = Vec3::from(aabb.half_extents) * scale.abs();
    ray_aabb_intersect(ray_origin, ray_dir, center - half, center + half)
}

pub(crate) fn ray_aabb_intersect(
    origin: Vec3,
    dir: Vec3,
    aabb_min: Vec3,
    aabb_max: Vec3,
) -> Option<f32> {
    let inv_dir = 1.0 / dir;
    let t1 = (aabb_min - origin) * inv_dir;
    let t2 = (aabb_max - origin) * inv_dir;
    let t_min = t1.min(t2);
    let t_max = t1.max(t2);
    let t_enter = t_min.x.max(t_min.y).max(t_min.z);
    let t_exit = t_max.x.min(t_max.y).min(t_max.z);
    if t_enter <= t_exit && t_exit > 0.0 {
        Some(t_enter.max(0.0))
    } else {
        None
    }
}

/// Highlight `entity`, restoring any previous selection first. The selected
/// coin stays highlighted when clicked again.
fn select_entity(
    entity: Entity,
    commands: &mut Commands,
    current_material: &MeshMaterial3d<StandardMaterial>,
    selected: &mut SelectedCoin,
    materials: &mut Assets<StandardMaterial>,
) {
    if selected.entity == Some(entity) {
        return;
    }

    restore_material(commands, selected);

    selected.entity = Some(entity);
    selected.original_material = Some(current_material.0.clone());

    if let Some(mat_data) = materials.get(&current_material.0) {
        let mut highlight = mat_data.clone();
        highlight.emissive = LinearRgba::rgb(0.9, 0.75, 0.2);
        let handle = materials.add(highlight);
        commands.entity(entity).insert(MeshMaterial3d(handle));
    }
}

fn restore_material(commands: &mut Commands, selected: &mut SelectedCoin) {
    if let (Some(entity), Some(original)) =
        (selected.entity.take(), selected.original_material.take())
    {
        if let Some(mut entity) = commands.get_entity(entity) {
            entity.insert(MeshMaterial3d(original));
        }
    }
}

/// Coins are despawned on every clear; drop a selection that went with them.
fn forget_despawned_selection(mut selected: ResMut<SelectedCoin>, coins: Query<(), With<Coin>>) {
    if let Some(entity) = selected.entity {
        if coins.get(entity).is_err() {
            selected.entity = None;
            selected.original_material = None;
        }
    }
}

fn dismiss_selection_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut commands: Commands,
    mut selected: ResMut<SelectedCoin>,
    mut hud: Option<ResMut<HudState>>,
) {
    if keys.just_pressed(KeyCode::Escape) {
        restore_material(&mut commands, &mut selected);
        if let Some(hud) = hud.as_mut() {
            hud.last_selection = None;
        }
    }
}

fn inspector_panel_system(
    mut contexts: EguiContexts,
    selected: Res<SelectedCoin>,
    coins: Query<&Coin>,
) {
    let Some(coin) = selected.entity.and_then(|entity| coins.get(entity).ok()) else {
        return;
    };

    let color = symbol_color(&coin.symbol).to_srgba();
    egui::SidePanel::right("inspector")
        .default_width(240.0)
        .frame(
            egui::Frame::default()
                .fill(egui::Color32::from_rgba_premultiplied(20, 16, 10, 220))
                .inner_margin(egui::Margin::same(14)),
        )
        .show(contexts.ctx_mut(), |ui| {
            ui.style_mut().override_text_style = Some(egui::TextStyle::Monospace);
            ui.visuals_mut().override_text_color = Some(egui::Color32::from_rgb(230, 220, 200));

            ui.label(
                egui::RichText::new(&coin.symbol).size(18.0).color(egui::Color32::from_rgb(
                    (color.red * 255.0) as u8,
                    (color.green * 255.0) as u8,
                    (color.blue * 255.0) as u8,
                )),
            );
            ui.add_space(8.0);
            ui.label(format!("Worth  {} {}", coin.count_per_coin, coin.symbol));
            ui.add_space(12.0);

            ui.label(
                egui::RichText::new("Esc to dismiss")
                    .size(11.0)
                    .color(egui::Color32::from_rgb(140, 130, 120)),
            );
        });
}
