//! Common test utilities for integration tests.

#![allow(dead_code)]

use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll};
use bevy::prelude::*;
use bevy::transform::TransformPlugin;
use orrery::OrreryPlugin;
use orrery::camera::CameraRig;
use orrery::catalog::Catalog;
use orrery::render::ShipModelPlugin;
use orrery::scene::{AssembledScene, SimulationContext};

/// Headless app with the orrery core and the input resources it reads.
///
/// Input resources are plain resources here: no input plugin clears them
/// between frames, so tests control exactly which keys are down.
pub fn headless_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, TransformPlugin));
    add_orrery(&mut app);
    app
}

/// Headless app that also runs the ship model loader against the asset
/// server. No glTF loader or asset files are present, so loads fail.
pub fn ship_loading_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, TransformPlugin, AssetPlugin::default()))
        .init_asset::<Scene>();
    add_orrery(&mut app);
    app.add_plugins(ShipModelPlugin);
    app
}

fn add_orrery(app: &mut App) {
    app.init_resource::<ButtonInput<KeyCode>>()
        .init_resource::<ButtonInput<MouseButton>>()
        .init_resource::<AccumulatedMouseMotion>()
        .init_resource::<AccumulatedMouseScroll>()
        .insert_resource(Catalog::solar_system().expect("built-in catalog"))
        .add_plugins(OrreryPlugin);
}

/// Headless app after its first frame, with the scene assembled.
pub fn started_app() -> App {
    let mut app = headless_app();
    app.update();
    app
}

pub fn scene(app: &App) -> AssembledScene {
    app.world()
        .resource::<SimulationContext>()
        .scene()
        .cloned()
        .expect("scene should be assembled")
}

pub fn rig(app: &App) -> &CameraRig {
    app.world().resource::<CameraRig>()
}

/// Press the view toggle key for exactly one frame.
pub fn press_toggle(app: &mut App) {
    let key = rig(app).settings().toggle_key;
    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .press(key);
    app.update();

    let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
    keys.release(key);
    keys.clear();
}

/// Hold a key for `frames` frames, then release it.
pub fn hold_key(app: &mut App, key: KeyCode, frames: usize) {
    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .press(key);
    for _ in 0..frames {
        app.update();
    }
    let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
    keys.release(key);
    keys.clear();
}

/// Parent of `entity`, if it has one.
pub fn parent_of(app: &App, entity: Entity) -> Option<Entity> {
    app.world().get::<ChildOf>(entity).map(|c| c.parent())
}
