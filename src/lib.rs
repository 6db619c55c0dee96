//! Orrery - procedural solar system model
//!
//! Builds a scale model of the solar system from a compact body table,
//! animates planets along parametric ellipses and moons around pivot nodes,
//! and drives a camera that switches between free flight and orbiting.

pub mod animation;
pub mod camera;
pub mod catalog;
pub mod orbit;
pub mod render;
pub mod scene;
pub mod types;

use bevy::prelude::*;

use crate::animation::AnimationPlugin;
use crate::camera::CameraPlugin;
use crate::scene::ScenePlugin;
use crate::types::OrrerySet;

/// Scene assembly, animation and camera control, without any rendering.
///
/// Expects a [`catalog::Catalog`] resource and the input resources the
/// camera reads (`ButtonInput<KeyCode>`, `ButtonInput<MouseButton>`,
/// `AccumulatedMouseMotion`, `AccumulatedMouseScroll`).
pub struct OrreryPlugin;

impl Plugin for OrreryPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (OrrerySet::Input, OrrerySet::Animate, OrrerySet::Camera).chain(),
        )
        .add_plugins((ScenePlugin, AnimationPlugin, CameraPlugin));
    }
}
