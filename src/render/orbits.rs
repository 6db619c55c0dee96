//! Orbit line rendering using Bevy Gizmos.
//!
//! The polylines are computed once at assembly; this only redraws them.

use bevy::prelude::*;

use crate::orbit::OrbitPath;

/// Plugin providing orbit line visualization.
pub struct OrbitLinePlugin;

impl Plugin for OrbitLinePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OrbitLineSettings>()
            .add_systems(Update, draw_orbit_lines);
    }
}

/// Settings for orbit line rendering.
#[derive(Resource)]
pub struct OrbitLineSettings {
    /// Whether to show orbit lines.
    pub visible: bool,
    pub color: Color,
}

impl Default for OrbitLineSettings {
    fn default() -> Self {
        Self {
            visible: true,
            color: Color::WHITE,
        }
    }
}

fn draw_orbit_lines(
    mut gizmos: Gizmos,
    settings: Res<OrbitLineSettings>,
    paths: Query<(&OrbitPath, &GlobalTransform)>,
) {
    if !settings.visible {
        return;
    }

    for (path, transform) in &paths {
        gizmos.linestrip(
            path.points_3d(0.0).map(|p| transform.transform_point(p)),
            settings.color,
        );
    }
}
