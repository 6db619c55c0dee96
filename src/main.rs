//! Orrery - procedural solar system model
//!
//! Desktop viewer: fly around the solar system in a ship, or press Enter to
//! orbit the Sun instead.

use bevy::prelude::*;

use orrery::OrreryPlugin;
use orrery::catalog::{Catalog, CatalogError};
use orrery::render::RenderPlugin;

fn main() -> Result<(), CatalogError> {
    // A malformed table must stop us before anything is spawned.
    let catalog = Catalog::solar_system()?;

    App::new()
        .add_plugins(DefaultPlugins)
        // Insert resources before plugins that depend on them
        .insert_resource(catalog)
        .add_plugins((OrreryPlugin, RenderPlugin))
        .run();

    Ok(())
}
