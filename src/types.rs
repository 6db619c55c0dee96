//! Shared node tags, system sets and simulated-time constants.

use std::time::Duration;

use bevy::prelude::*;

/// Simulated time units per real millisecond. One unit per real second.
pub const TIME_SCALE_PER_MS: f64 = 0.001;

/// Ordering of the per-frame work.
///
/// Input handling (the view toggle) runs before the camera controllers so a
/// swapped controller never sees the frame that swapped it twice.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum OrrerySet {
    /// Discrete input events (view toggle).
    Input,
    /// Planet and moon transforms.
    Animate,
    /// Ship attachment and active navigation controller.
    Camera,
}

/// What a scene node is, fixed at spawn time.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SceneNode {
    Star,
    StarLight,
    Planet,
    /// Invisible rotation anchor carrying one moon.
    Pivot,
    Moon,
    OrbitLine,
    Camera,
    Ship,
}

impl SceneNode {
    /// Whether the node is drawn as a sphere.
    pub fn is_body(self) -> bool {
        matches!(self, SceneNode::Star | SceneNode::Planet | SceneNode::Moon)
    }
}

/// Elapsed-time bookkeeping for the animation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationClock {
    /// Clock reading when the scene was assembled.
    pub started_at: Duration,
    /// Simulated units per real millisecond.
    pub time_scale: f64,
}

impl SimulationClock {
    pub fn new(started_at: Duration, time_scale: f64) -> Self {
        Self {
            started_at,
            time_scale,
        }
    }

    /// `t = (now - start) * time_scale`, with `now` and `start` in milliseconds.
    pub fn simulated_time(&self, now: Duration) -> f64 {
        let elapsed_ms = now.saturating_sub(self.started_at).as_secs_f64() * 1000.0;
        elapsed_ms * self.time_scale
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(Duration::ZERO, TIME_SCALE_PER_MS)
    }
}
