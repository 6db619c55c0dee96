//! Ship model loading against a real asset server.
//!
//! The model file does not exist here, so every load ends unavailable; what
//! matters is that each camera rig gets its load resolved.

mod common;

use std::thread::sleep;
use std::time::Duration;

use bevy::prelude::*;
use orrery::camera::ship::ShipState;
use orrery::catalog::Catalog;
use orrery::scene::{AssemblySettings, assemble, teardown};

use common::{rig, ship_loading_app};

/// Run frames until the rig's ship load settles, giving the IO pool time.
fn settle_ship(app: &mut App) -> ShipState {
    for _ in 0..500 {
        app.update();
        if rig(app).ship() != ShipState::Loading {
            break;
        }
        sleep(Duration::from_millis(2));
    }
    rig(app).ship()
}

#[test]
fn test_missing_model_leaves_ship_unavailable() {
    let mut app = ship_loading_app();
    assert_eq!(settle_ship(&mut app), ShipState::Unavailable);

    // Still usable without a ship.
    app.update();
    assert_eq!(rig(&app).ship(), ShipState::Unavailable);
}

#[test]
fn test_rebuilt_scene_requests_ship_again() {
    let mut app = ship_loading_app();
    assert_eq!(settle_ship(&mut app), ShipState::Unavailable);

    assert!(teardown(app.world_mut()));
    let catalog = app.world().resource::<Catalog>().clone();
    assemble(app.world_mut(), &catalog, &AssemblySettings::default()).unwrap();
    assert_eq!(rig(&app).ship(), ShipState::Loading);

    assert_eq!(settle_ship(&mut app), ShipState::Unavailable);
}
