//! Asynchronous ship model loading.
//!
//! The glTF load is requested whenever a camera rig is installed and polled
//! every frame until it settles. Success spawns the ship node and hands it to
//! the rig; failure is logged and not retried for that rig.

use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::camera::CameraRig;
use crate::camera::ship::{ShipLoad, ShipSettings};
use crate::types::OrrerySet;

/// Plugin loading the ship model.
pub struct ShipModelPlugin;

impl Plugin for ShipModelPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                request_ship_model.run_if(resource_added::<CameraRig>),
                poll_ship_model
                    .run_if(resource_exists::<ShipModel>.and(resource_exists::<CameraRig>)),
            )
                .chain()
                .in_set(OrrerySet::Input),
        );
    }
}

/// In-flight ship model load.
#[derive(Resource)]
struct ShipModel {
    handle: Handle<Scene>,
}

fn request_ship_model(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    settings: Res<ShipSettings>,
) {
    // A rebuilt scene gets a fresh rig that starts out loading.
    let handle = asset_server.load(GltfAssetLabel::Scene(0).from_asset(settings.model_path.clone()));
    commands.insert_resource(ShipModel { handle });
    debug!("Requested ship model {}", settings.model_path);
}

fn poll_ship_model(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    model: Res<ShipModel>,
    settings: Res<ShipSettings>,
    mut rig: ResMut<CameraRig>,
) {
    match asset_server.load_state(model.handle.id()) {
        LoadState::Loaded => {
            let ship = commands
                .spawn((settings.node(), SceneRoot(model.handle.clone())))
                .id();
            rig.resolve_ship(ShipLoad::Loaded(ship));
            commands.remove_resource::<ShipModel>();
            info!("Ship model {} loaded", settings.model_path);
        }
        LoadState::Failed(err) => {
            error!("Failed to load ship model {}: {err}", settings.model_path);
            rig.resolve_ship(ShipLoad::Failed);
            commands.remove_resource::<ShipModel>();
        }
        _ => {}
    }
}
