//! The ship node that rides under the camera in flight mode.
//!
//! The model loads asynchronously; the rig only learns about the ship once the
//! load resolves. Until then, and forever if the load fails, toggling views
//! has no ship to move.

use bevy::prelude::*;

use super::CameraRig;
use crate::types::SceneNode;

/// Where the ship model comes from and how it sits in front of the camera.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct ShipSettings {
    /// glTF file relative to the asset root; scene 0 is used.
    pub model_path: String,
    pub scale: f32,
    /// Offset from the camera, in camera space.
    pub offset: Vec3,
}

impl Default for ShipSettings {
    fn default() -> Self {
        Self {
            model_path: "models/ship.glb".to_string(),
            scale: 0.5,
            offset: Vec3::new(0.0, -1.0, -10.0),
        }
    }
}

impl ShipSettings {
    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.offset).with_scale(Vec3::splat(self.scale))
    }

    /// Components for a ship node; the model itself is added by the caller.
    pub fn node(&self) -> (SceneNode, Transform, Visibility, Name) {
        (
            SceneNode::Ship,
            self.transform(),
            Visibility::Hidden,
            Name::new("Ship"),
        )
    }
}

/// Outcome of the one-shot model load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShipLoad {
    Loaded(Entity),
    Failed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShipState {
    #[default]
    Loading,
    Loaded(Entity),
    /// The load failed; there is no retry.
    Unavailable,
}

impl ShipState {
    /// Settle a pending load. Returns false if the state was already settled.
    pub fn resolve(&mut self, outcome: ShipLoad) -> bool {
        if *self != ShipState::Loading {
            return false;
        }
        *self = match outcome {
            ShipLoad::Loaded(entity) => ShipState::Loaded(entity),
            ShipLoad::Failed => ShipState::Unavailable,
        };
        true
    }

    pub fn entity(&self) -> Option<Entity> {
        match self {
            ShipState::Loaded(entity) => Some(*entity),
            _ => None,
        }
    }
}

/// Make the ship's parent match the rig's mode: child of the camera in flight
/// mode, detached and hidden otherwise.
pub fn sync_ship_attachment(
    mut commands: Commands,
    rig: Res<CameraRig>,
    mut ships: Query<(Option<&ChildOf>, &mut Visibility)>,
) {
    let Some(ship) = rig.ship().entity() else {
        return;
    };
    let Ok((parent, mut visibility)) = ships.get_mut(ship) else {
        return;
    };

    let camera = rig.camera();
    let attached = parent.is_some_and(|p| p.parent() == camera);

    if rig.ship_attached() {
        if !attached {
            commands.entity(ship).insert(ChildOf(camera));
            *visibility = Visibility::Inherited;
            debug!("Ship attached to camera");
        }
    } else if parent.is_some() {
        commands.entity(ship).remove::<ChildOf>();
        *visibility = Visibility::Hidden;
        debug!("Ship detached from camera");
    }
}
