//! Meshes, materials and lights for assembled nodes.
//!
//! Assembly only spawns logical nodes; this dresses them once, the frame
//! after they appear.

use bevy::asset::LoadState;
use bevy::light::NotShadowCaster;
use bevy::prelude::*;

use crate::camera::{CameraSettings, MainCamera};
use crate::scene::{Body, StarLight, Surface};
use crate::types::SceneNode;

/// Plugin providing body and light visuals.
pub struct BodyVisualsPlugin;

impl Plugin for BodyVisualsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PendingTextures>().add_systems(
            Update,
            (dress_bodies, dress_star_light, dress_camera, report_failed_textures),
        );
    }
}

/// Textures requested but not yet known to have loaded.
#[derive(Resource, Default)]
pub struct PendingTextures {
    handles: Vec<(String, Handle<Image>)>,
}

/// Sphere resolution (sectors and stacks) per node kind.
fn sphere_resolution(node: SceneNode) -> u32 {
    match node {
        SceneNode::Star => 50,
        SceneNode::Planet => 32,
        _ => 16,
    }
}

fn dress_bodies(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
    mut pending: ResMut<PendingTextures>,
    bodies: Query<(Entity, &Body, &Surface, &SceneNode), Added<Body>>,
) {
    for (entity, body, surface, node) in &bodies {
        let resolution = sphere_resolution(*node);
        let mesh = meshes.add(Sphere::new(body.radius).mesh().uv(resolution, resolution));

        let material = match surface {
            Surface::Texture(path) => {
                let texture: Handle<Image> = asset_server.load(path.clone());
                pending.handles.push((path.clone(), texture.clone()));
                StandardMaterial {
                    base_color_texture: Some(texture),
                    // The star is its own light source.
                    unlit: *node == SceneNode::Star,
                    metallic: 0.0,
                    perceptual_roughness: 1.0,
                    ..default()
                }
            }
            Surface::Color(color) => StandardMaterial {
                base_color: *color,
                ..default()
            },
        };

        let mut entity_commands = commands.entity(entity);
        entity_commands.insert((Mesh3d(mesh), MeshMaterial3d(materials.add(material))));
        if *node == SceneNode::Star {
            // The light sits inside the star.
            entity_commands.insert(NotShadowCaster);
        }
    }
}

fn dress_star_light(mut commands: Commands, lights: Query<(Entity, &StarLight), Added<StarLight>>) {
    for (entity, light) in &lights {
        commands.entity(entity).insert(PointLight {
            intensity: light.intensity,
            range: light.range,
            shadows_enabled: true,
            ..default()
        });
    }
}

fn dress_camera(
    mut commands: Commands,
    settings: Res<CameraSettings>,
    cameras: Query<Entity, Added<MainCamera>>,
) {
    for entity in &cameras {
        commands.entity(entity).insert((
            Camera3d::default(),
            Projection::from(PerspectiveProjection {
                fov: settings.fov_degrees.to_radians(),
                near: settings.near,
                far: settings.far,
                ..default()
            }),
        ));
    }
}

/// Log each texture that fails to load; the body keeps its plain material.
fn report_failed_textures(asset_server: Res<AssetServer>, mut pending: ResMut<PendingTextures>) {
    pending
        .handles
        .retain(|(path, handle)| match asset_server.load_state(handle.id()) {
            LoadState::Failed(err) => {
                warn!("Texture {path} failed to load: {err}");
                false
            }
            LoadState::Loaded => false,
            _ => true,
        });
}
