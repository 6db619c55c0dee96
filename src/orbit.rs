//! Orbit geometry: ellipse descriptors and the polylines drawn for them.
//!
//! Orbits are origin-centred ellipses in the XY plane. The horizontal
//! semi-axis comes from the apoapsis factor and the vertical one from the
//! periapsis factor, matching the parametrization the animation uses.

use std::f32::consts::TAU;

use bevy::prelude::*;

/// Number of segments sampled around an orbit. The polyline holds one more
/// point than this so the last point closes the loop.
pub const ORBIT_SEGMENTS: usize = 100;

/// Origin-centred ellipse in the orbital plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipse {
    /// Semi-axis along X.
    pub semi_x: f32,
    /// Semi-axis along Y.
    pub semi_y: f32,
}

impl Ellipse {
    pub fn new(scale_distance: f32, apoapsis_factor: f32, periapsis_factor: f32) -> Self {
        Self {
            semi_x: scale_distance * apoapsis_factor,
            semi_y: scale_distance * periapsis_factor,
        }
    }

    /// Point at parametric angle `theta`, counterclockwise from +X.
    pub fn point_at(&self, theta: f32) -> Vec2 {
        Vec2::new(self.semi_x * theta.cos(), self.semi_y * theta.sin())
    }

    /// `(x/a)² + (y/b)² - 1`; zero for points on the ellipse.
    pub fn residual(&self, point: Vec2) -> f32 {
        (point.x / self.semi_x).powi(2) + (point.y / self.semi_y).powi(2) - 1.0
    }
}

/// Read-only orbit visualization: the ellipse and its closed polyline.
#[derive(Component, Clone, Debug)]
pub struct OrbitPath {
    ellipse: Ellipse,
    points: Vec<Vec2>,
}

impl OrbitPath {
    /// Sample the orbit of a body placed at `scale_distance` with the given
    /// normalized shape factors.
    pub fn build(scale_distance: f32, apoapsis_factor: f32, periapsis_factor: f32) -> Self {
        let ellipse = Ellipse::new(scale_distance, apoapsis_factor, periapsis_factor);
        let points = (0..=ORBIT_SEGMENTS)
            .map(|i| {
                if i == ORBIT_SEGMENTS {
                    // Close exactly on the first sample rather than on cos(TAU).
                    ellipse.point_at(0.0)
                } else {
                    ellipse.point_at(i as f32 / ORBIT_SEGMENTS as f32 * TAU)
                }
            })
            .collect();
        Self { ellipse, points }
    }

    pub fn ellipse(&self) -> Ellipse {
        self.ellipse
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Points lifted into the scene at `z`.
    pub fn points_3d(&self, z: f32) -> impl Iterator<Item = Vec3> + '_ {
        self.points.iter().map(move |p| p.extend(z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_semi_axes_scale_with_distance() {
        let ellipse = Ellipse::new(30.0, 0.6, 0.5);
        assert_abs_diff_eq!(ellipse.semi_x, 18.0, epsilon = 1e-5);
        assert_abs_diff_eq!(ellipse.semi_y, 15.0, epsilon = 1e-5);
    }

    #[test]
    fn test_path_has_101_points_and_closes() {
        let path = OrbitPath::build(60.0, 1.1, 0.9);
        assert_eq!(path.points().len(), 101);
        assert_eq!(path.points().first(), path.points().last());
    }

    #[test]
    fn test_first_quarter_point() {
        let path = OrbitPath::build(30.0, 0.6, 0.5);
        // Sample 25 sits at θ = π/2.
        let p = path.points()[25];
        assert_abs_diff_eq!(p.x, 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(p.y, 15.0, epsilon = 1e-4);
    }

    #[test]
    fn test_points_3d_keeps_plane() {
        let path = OrbitPath::build(30.0, 1.0, 1.0);
        assert!(path.points_3d(0.0).all(|p| p.z == 0.0));
    }
}
