//! OrbitCamera component and system: left-drag to orbit, scroll to zoom.

use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll};
use bevy::prelude::*;

#[derive(Component, Clone, Debug)]
pub struct OrbitCamera {
    pub pivot: Vec3,
    /// Radians.
    pub yaw: f32,
    /// Radians, positive looks down on the pivot.
    pub pitch: f32,
    pub distance: f32,
    pub target_yaw: f32,
    pub target_pitch: f32,
    pub target_distance: f32,
    pub pitch_limits: (f32, f32),
    pub distance_limits: (f32, f32),
    /// Radians per pixel of drag.
    pub sensitivity: f32,
    pub zoom_step: f32,
    /// Seconds to cover most of the way to the target.
    pub smoothing: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        let pitch = 15f32.to_radians();
        Self {
            pivot: Vec3::new(0.0, 1.0, -2.0),
            yaw: 0.0,
            pitch,
            distance: 9.0,
            target_yaw: 0.0,
            target_pitch: pitch,
            target_distance: 9.0,
            pitch_limits: (10f32.to_radians(), 70f32.to_radians()),
            distance_limits: (3.0, 14.0),
            sensitivity: 0.005,
            zoom_step: 0.8,
            smoothing: 0.15,
        }
    }
}

impl OrbitCamera {
    /// Apply a drag delta (pixels) and scroll lines to the targets.
    pub fn apply_input(&mut self, drag: Vec2, scroll: f32) {
        self.target_yaw -= drag.x * self.sensitivity;
        self.target_pitch = (self.target_pitch + drag.y * self.sensitivity)
            .clamp(self.pitch_limits.0, self.pitch_limits.1);
        self.target_distance = (self.target_distance - scroll * self.zoom_step)
            .clamp(self.distance_limits.0, self.distance_limits.1);
    }

    /// Move the current angles and distance toward their targets.
    pub fn smooth(&mut self, dt: f32) {
        let t = smoothing_factor(self.smoothing, dt);
        self.yaw += (self.target_yaw - self.yaw) * t;
        self.pitch += (self.target_pitch - self.pitch) * t;
        self.distance += (self.target_distance - self.distance) * t;
    }

    pub fn transform(&self) -> Transform {
        orbit_transform(self.pivot, self.yaw, self.pitch, self.distance)
    }
}

fn smoothing_factor(smoothing: f32, dt: f32) -> f32 {
    if smoothing <= 0.0 {
        return 1.0;
    }
    1.0 - (-dt * 3.0 / smoothing).exp()
}

/// Camera transform at `distance` from `pivot`, looking at it.
pub fn orbit_transform(pivot: Vec3, yaw: f32, pitch: f32, distance: f32) -> Transform {
    let rotation = Quat::from_euler(EulerRot::YXZ, yaw, -pitch, 0.0);
    let position = pivot + rotation * Vec3::new(0.0, 0.0, distance);
    Transform::from_translation(position).looking_at(pivot, Vec3::Y)
}

pub fn orbit_camera_plugin(app: &mut App) {
    app.add_systems(Update, orbit_camera_system);
}

fn orbit_camera_system(
    time: Res<Time>,
    mouse: Res<ButtonInput<MouseButton>>,
    motion: Res<AccumulatedMouseMotion>,
    scroll: Res<AccumulatedMouseScroll>,
    mut cameras: Query<(&mut OrbitCamera, &mut Transform)>,
) {
    let drag = if mouse.pressed(MouseButton::Left) {
        motion.delta
    } else {
        Vec2::ZERO
    };

    for (mut orbit, mut transform) in &mut cameras {
        orbit.apply_input(drag, scroll.delta.y);
        orbit.smooth(time.delta_secs());
        *transform = orbit.transform();
    }
}
