//! Per-frame animation of planets and moons.
//!
//! Planet positions are a pure function of simulated time. Moon pivots instead
//! advance by a fixed angle every frame, so moons orbit faster at higher frame
//! rates; planet motion does not depend on frame rate.

use std::f32::consts::TAU;

use bevy::prelude::*;

use crate::scene::{MoonPivot, OrbitalMotion, SimulationContext};
use crate::types::{OrrerySet, TIME_SCALE_PER_MS};

#[derive(Resource, Clone, Debug, PartialEq)]
pub struct AnimationSettings {
    /// Simulated units per real millisecond.
    pub time_scale: f64,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            time_scale: TIME_SCALE_PER_MS,
        }
    }
}

/// Plugin animating the assembled scene.
pub struct AnimationPlugin;

impl Plugin for AnimationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AnimationSettings>().add_systems(
            Update,
            (advance_planets, spin_moon_pivots).in_set(OrrerySet::Animate),
        );
    }
}

/// Position on the orbit ellipse at simulated time `t`, counterclockwise from
/// `(f1 * base_distance, 0)`.
pub fn planet_position(motion: &OrbitalMotion, t: f64) -> Vec2 {
    let angle = t * motion.speed as f64;
    let base = motion.base_distance as f64;
    Vec2::new(
        (angle.cos() * motion.f1 as f64 * base) as f32,
        (angle.sin() * motion.f2 as f64 * base) as f32,
    )
}

impl MoonPivot {
    /// One frame of spin.
    pub fn advance(&mut self) {
        self.angle = (self.angle + self.speed).rem_euclid(TAU);
    }
}

/// Place every planet on its ellipse for the current simulated time.
pub fn advance_planets(
    time: Res<Time>,
    context: Res<SimulationContext>,
    mut planets: Query<(&OrbitalMotion, &mut Transform)>,
) {
    let Some(clock) = context.clock() else {
        return;
    };
    let t = clock.simulated_time(time.elapsed());

    for (motion, mut transform) in &mut planets {
        let position = planet_position(motion, t);
        transform.translation.x = position.x;
        transform.translation.y = position.y;
    }
}

/// Advance every moon pivot by its per-frame angle.
pub fn spin_moon_pivots(mut pivots: Query<(&mut MoonPivot, &mut Transform)>) {
    for (mut pivot, mut transform) in &mut pivots {
        pivot.advance();
        transform.rotation = pivot.rotation();
    }
}
