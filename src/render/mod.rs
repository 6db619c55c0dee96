//! Rendering for the solar system scene.
//!
//! Dresses assembled nodes with meshes and materials, sets the ambient light,
//! loads the ship model and draws orbit lines. Needs the asset, PBR and gizmo
//! plugins, so it is only added to the windowed app.

mod bodies;
mod lighting;
mod orbits;
mod ship;

use bevy::prelude::*;

use self::bodies::BodyVisualsPlugin;
use self::lighting::LightingPlugin;
use self::orbits::OrbitLinePlugin;

pub use self::bodies::PendingTextures;
pub use self::lighting::AmbientSettings;
pub use self::orbits::OrbitLineSettings;
pub use self::ship::ShipModelPlugin;

/// Plugin aggregating all rendering functionality.
pub struct RenderPlugin;

impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::BLACK))
            .add_plugins((
                BodyVisualsPlugin,
                LightingPlugin,
                OrbitLinePlugin,
                ShipModelPlugin,
            ));
    }
}
