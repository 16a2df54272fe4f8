//! Vault room, lighting, and the door that swings open on the first deposit.

use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;

use crate::camera::OrbitCamera;
use crate::orchestrator::Orchestrator;
use crate::scene::materials;

const ROOM_WIDTH: f32 = 8.0;
const ROOM_DEPTH: f32 = 6.0;
const ROOM_HEIGHT: f32 = 3.5;
const WALL_THICKNESS: f32 = 0.2;

#[derive(Resource, Clone, Debug)]
pub struct DoorSettings {
    /// Yaw of the fully open door, radians. Negative swings outward.
    pub open_angle: f32,
    /// Radians per second while opening.
    pub swing_speed: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for DoorSettings {
    fn default() -> Self {
        Self {
            open_angle: -FRAC_PI_2 * 1.2,
            swing_speed: 1.4,
            width: 2.4,
            height: 2.8,
        }
    }
}

/// Door hinge. The door panel is a child offset by half its width.
#[derive(Component, Debug, Default)]
pub struct VaultDoor {
    pub is_open: bool,
    pub angle: f32,
}

impl VaultDoor {
    pub fn open(&mut self) {
        self.is_open = true;
    }

    /// Closing snaps shut; there is no closing animation.
    pub fn close(&mut self) {
        self.is_open = false;
        self.angle = 0.0;
    }
}

/// Advance a door angle toward its target by at most `speed * dt`.
pub fn step_door_angle(current: f32, target: f32, speed: f32, dt: f32) -> f32 {
    let max_step = speed * dt;
    let delta = target - current;
    if delta.abs() <= max_step {
        target
    } else {
        current + max_step * delta.signum()
    }
}

pub fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials_res: ResMut<Assets<StandardMaterial>>,
    door_settings: Option<Res<DoorSettings>>,
    orchestrator: Option<Res<Orchestrator>>,
) {
    let door_settings = door_settings
        .map(|settings| (*settings).clone())
        .unwrap_or_default();

    commands.spawn((
        Camera3d::default(),
        OrbitCamera::default(),
        Transform::from_xyz(0.0, 3.0, 9.0).looking_at(Vec3::new(0.0, 1.0, 0.0), Vec3::Y),
    ));
    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 8.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.spawn((
        PointLight {
            intensity: 200_000.0,
            color: Color::srgb(1.0, 0.9, 0.7),
            ..default()
        },
        Transform::from_xyz(0.0, ROOM_HEIGHT - 0.4, -ROOM_DEPTH / 2.0),
    ));
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 0.3,
    });

    let wall = materials::vault_wall_material(&mut materials_res);
    let half_depth = ROOM_DEPTH / 2.0;

    let side_width = (ROOM_WIDTH - door_settings.width) / 2.0;
    let lintel_height = (ROOM_HEIGHT - door_settings.height).max(0.0);

    // Floor, back and side walls, then the front wall around the door opening.
    let slabs = [
        (
            Vec3::new(ROOM_WIDTH, WALL_THICKNESS, ROOM_DEPTH),
            Vec3::new(0.0, -WALL_THICKNESS / 2.0, -half_depth),
        ),
        (
            Vec3::new(ROOM_WIDTH, ROOM_HEIGHT, WALL_THICKNESS),
            Vec3::new(0.0, ROOM_HEIGHT / 2.0, -ROOM_DEPTH),
        ),
        (
            Vec3::new(WALL_THICKNESS, ROOM_HEIGHT, ROOM_DEPTH),
            Vec3::new(-ROOM_WIDTH / 2.0, ROOM_HEIGHT / 2.0, -half_depth),
        ),
        (
            Vec3::new(WALL_THICKNESS, ROOM_HEIGHT, ROOM_DEPTH),
            Vec3::new(ROOM_WIDTH / 2.0, ROOM_HEIGHT / 2.0, -half_depth),
        ),
        (
            Vec3::new(side_width, ROOM_HEIGHT, WALL_THICKNESS),
            Vec3::new(-(ROOM_WIDTH - side_width) / 2.0, ROOM_HEIGHT / 2.0, 0.0),
        ),
        (
            Vec3::new(side_width, ROOM_HEIGHT, WALL_THICKNESS),
            Vec3::new((ROOM_WIDTH - side_width) / 2.0, ROOM_HEIGHT / 2.0, 0.0),
        ),
        (
            Vec3::new(door_settings.width, lintel_height, WALL_THICKNESS),
            Vec3::new(0.0, ROOM_HEIGHT - lintel_height / 2.0, 0.0),
        ),
    ];
    for (size, center) in slabs {
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::from_size(size))),
            MeshMaterial3d(wall.clone()),
            Transform::from_translation(center),
        ));
    }

    let opened = orchestrator.is_some_and(|o| o.door_opened());
    let door = VaultDoor {
        is_open: opened,
        angle: if opened { door_settings.open_angle } else { 0.0 },
    };
    let hinge = Vec3::new(-door_settings.width / 2.0, 0.0, 0.2);
    let door_material = materials::vault_door_material(&mut materials_res);
    let door_mesh = meshes.add(Cuboid::new(door_settings.width, door_settings.height, 0.25));
    let handle_mesh = meshes.add(Cylinder::new(0.35, 0.08));

    commands
        .spawn((
            Name::new("Vault door hinge"),
            Transform::from_translation(hinge).with_rotation(Quat::from_rotation_y(door.angle)),
            Visibility::Visible,
            door,
        ))
        .with_children(|hinge| {
            hinge.spawn((
                Mesh3d(door_mesh),
                MeshMaterial3d(door_material.clone()),
                Transform::from_xyz(door_settings.width / 2.0, door_settings.height / 2.0, 0.0),
            ));
            hinge.spawn((
                Mesh3d(handle_mesh),
                MeshMaterial3d(door_material),
                Transform::from_xyz(door_settings.width / 2.0, door_settings.height / 2.0, 0.15)
                    .with_rotation(Quat::from_rotation_x(FRAC_PI_2)),
            ));
        });
}

pub fn animate_door_system(
    time: Res<Time>,
    settings: Res<DoorSettings>,
    mut doors: Query<(&mut VaultDoor, &mut Transform)>,
) {
    for (mut door, mut transform) in &mut doors {
        let target = if door.is_open { settings.open_angle } else { 0.0 };
        if door.angle != target {
            door.angle = step_door_angle(door.angle, target, settings.swing_speed, time.delta_secs());
        }
        transform.rotation = Quat::from_rotation_y(door.angle);
    }
}
