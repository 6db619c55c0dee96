//! Body catalog for the procedural solar system.
//!
//! Radii and orbit factors are display-scaled values, not physical units: the
//! periapsis/apoapsis factors are tuned per planet so every ellipse fits the
//! camera range once the scene assembler normalizes them.

use bevy::prelude::*;

/// Static parameters for one catalog entry.
#[derive(Clone, Debug, PartialEq)]
pub struct CelestialBodySpec {
    pub name: &'static str,
    /// Mean radius before scene scaling.
    pub mean_radius: f32,
    /// Orbital angular speed before scene scaling. Zero marks the star.
    pub orbit_speed: f32,
    pub periapsis: Option<f32>,
    pub apoapsis: Option<f32>,
}

impl CelestialBodySpec {
    pub const fn star(name: &'static str, mean_radius: f32) -> Self {
        Self {
            name,
            mean_radius,
            orbit_speed: 0.0,
            periapsis: None,
            apoapsis: None,
        }
    }

    pub const fn planet(
        name: &'static str,
        mean_radius: f32,
        orbit_speed: f32,
        periapsis: f32,
        apoapsis: f32,
    ) -> Self {
        Self {
            name,
            mean_radius,
            orbit_speed,
            periapsis: Some(periapsis),
            apoapsis: Some(apoapsis),
        }
    }

    pub fn is_star(&self) -> bool {
        self.orbit_speed == 0.0
    }

    /// Texture path relative to the asset root.
    pub fn texture_path(&self) -> String {
        format!("textures/planets/{}.jpg", self.name)
    }
}

/// A moon, associated with its planet by name.
#[derive(Clone, Debug, PartialEq)]
pub struct MoonSpec {
    pub name: &'static str,
    pub parent: &'static str,
    pub radius: f32,
    /// Radial offset from the parent planet's centre.
    pub distance: f32,
    /// Pivot rotation applied every frame, in radians.
    pub speed: f32,
    /// sRGB colour as 0xRRGGBB.
    pub color: u32,
    /// Initial pivot rotation about X, in radians.
    pub tilt: f32,
}

impl MoonSpec {
    pub const fn new(
        name: &'static str,
        parent: &'static str,
        radius: f32,
        distance: f32,
        speed: f32,
        color: u32,
    ) -> Self {
        Self {
            name,
            parent,
            radius,
            distance,
            speed,
            color,
            tilt: 0.0,
        }
    }

    pub fn srgb(&self) -> Color {
        let [_, r, g, b] = self.color.to_be_bytes();
        Color::srgb_u8(r, g, b)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("catalog is empty")]
    Empty,

    #[error("catalog has no star (an entry with zero orbit speed)")]
    MissingStar,

    #[error("star {0} must be the first catalog entry")]
    StarNotFirst(&'static str),

    #[error("duplicate star {0}: only one entry may have zero orbit speed")]
    DuplicateStar(&'static str),

    #[error("body {0} is missing its periapsis/apoapsis factors")]
    MissingFactors(&'static str),

    #[error("body {name} has an invalid {field}: {value}")]
    InvalidValue {
        name: &'static str,
        field: &'static str,
        value: f32,
    },

    #[error("body name {0} appears more than once")]
    DuplicateName(&'static str),

    #[error("moon {moon} references unknown planet {parent}")]
    UnknownParent {
        moon: &'static str,
        parent: &'static str,
    },
}

/// Validated, ordered body table plus the moon association table.
#[derive(Resource, Clone, Debug)]
pub struct Catalog {
    bodies: Vec<CelestialBodySpec>,
    moons: Vec<MoonSpec>,
}

impl Catalog {
    /// Validate and build a catalog. The star must come first; planets follow
    /// in outward order.
    pub fn new(
        bodies: Vec<CelestialBodySpec>,
        moons: Vec<MoonSpec>,
    ) -> Result<Self, CatalogError> {
        let Some(first) = bodies.first() else {
            return Err(CatalogError::Empty);
        };

        if !first.is_star() {
            return match bodies.iter().find(|b| b.is_star()) {
                Some(star) => Err(CatalogError::StarNotFirst(star.name)),
                None => Err(CatalogError::MissingStar),
            };
        }

        check_positive(first.name, "mean radius", first.mean_radius)?;

        for (index, body) in bodies.iter().enumerate().skip(1) {
            if body.is_star() {
                return Err(CatalogError::DuplicateStar(body.name));
            }
            if bodies[..index].iter().any(|b| b.name == body.name) {
                return Err(CatalogError::DuplicateName(body.name));
            }
            let (Some(periapsis), Some(apoapsis)) = (body.periapsis, body.apoapsis) else {
                return Err(CatalogError::MissingFactors(body.name));
            };
            check_positive(body.name, "mean radius", body.mean_radius)?;
            check_positive(body.name, "periapsis", periapsis)?;
            check_positive(body.name, "apoapsis", apoapsis)?;
            if !body.orbit_speed.is_finite() {
                return Err(CatalogError::InvalidValue {
                    name: body.name,
                    field: "orbit speed",
                    value: body.orbit_speed,
                });
            }
        }

        for (index, moon) in moons.iter().enumerate() {
            if moons[..index].iter().any(|m| m.name == moon.name)
                || bodies.iter().any(|b| b.name == moon.name)
            {
                return Err(CatalogError::DuplicateName(moon.name));
            }
            let is_planet = bodies.iter().skip(1).any(|b| b.name == moon.parent);
            if !is_planet {
                return Err(CatalogError::UnknownParent {
                    moon: moon.name,
                    parent: moon.parent,
                });
            }
            check_positive(moon.name, "radius", moon.radius)?;
            check_positive(moon.name, "distance", moon.distance)?;
            if !moon.speed.is_finite() {
                return Err(CatalogError::InvalidValue {
                    name: moon.name,
                    field: "speed",
                    value: moon.speed,
                });
            }
        }

        Ok(Self { bodies, moons })
    }

    /// The Sun, the eight planets and their major moons.
    pub fn solar_system() -> Result<Self, CatalogError> {
        Self::new(SOLAR_SYSTEM.to_vec(), SOLAR_SYSTEM_MOONS.to_vec())
    }

    pub fn star(&self) -> &CelestialBodySpec {
        &self.bodies[0]
    }

    /// Every entry after the star, in outward order.
    pub fn planets(&self) -> &[CelestialBodySpec] {
        &self.bodies[1..]
    }

    pub fn bodies(&self) -> &[CelestialBodySpec] {
        &self.bodies
    }

    pub fn moons(&self) -> &[MoonSpec] {
        &self.moons
    }

    /// Moons orbiting the named planet, in table order.
    pub fn moons_of<'a>(&'a self, planet: &'a str) -> impl Iterator<Item = &'a MoonSpec> + 'a {
        self.moons.iter().filter(move |m| m.parent == planet)
    }
}

fn check_positive(name: &'static str, field: &'static str, value: f32) -> Result<(), CatalogError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CatalogError::InvalidValue { name, field, value })
    }
}

/// Sun first, then planets outward.
pub const SOLAR_SYSTEM: [CelestialBodySpec; 9] = [
    CelestialBodySpec::star("sun", 695.0),
    CelestialBodySpec::planet("mercury", 2.4397 * 2.0, 4.787, 46.0 * 3.0, 69.8 * 3.0),
    CelestialBodySpec::planet("venus", 6.0518 * 2.0, 3.502, 107.0 * 1.2, 109.0 * 1.2),
    CelestialBodySpec::planet("earth", 6.37814 * 2.0, 2.978, 147.0 / 1.3, 152.0 / 1.3),
    CelestialBodySpec::planet("mars", 3.3972 * 2.0, 2.4077, 206.0 / 1.9, 249.0 / 1.9),
    CelestialBodySpec::planet("jupiter", 71.492, 1.307, 741.0 / 6.0, 817.0 / 6.0),
    CelestialBodySpec::planet("saturn", 60.268, 0.969, 1350.0 / 10.0, 1510.0 / 10.0),
    CelestialBodySpec::planet("uranus", 25.559, 0.681, 2750.0 / 18.0, 3000.0 / 18.0),
    CelestialBodySpec::planet("neptune", 24.746, 0.543, 4450.0 / 25.0, 4550.0 / 25.0),
];

pub const SOLAR_SYSTEM_MOONS: [MoonSpec; 11] = [
    MoonSpec::new("moon", "earth", 1.0, 8.0, 0.01, 0xaaaaaa),
    MoonSpec::new("phobos", "mars", 0.5, 3.0, 0.05, 0x888888),
    MoonSpec::new("deimos", "mars", 0.3, 5.0, 0.03, 0xcccccc),
    // Galilean moons
    MoonSpec::new("io", "jupiter", 1.8, 20.0, 0.02, 0xffaa00),
    MoonSpec::new("europa", "jupiter", 1.5, 25.0, 0.015, 0xaaddff),
    MoonSpec::new("ganymede", "jupiter", 2.0, 30.0, 0.01, 0xddddaa),
    MoonSpec::new("callisto", "jupiter", 1.7, 35.0, 0.008, 0x888888),
    MoonSpec::new("titan", "saturn", 2.5, 20.0, 0.01, 0xffcc88),
    MoonSpec::new("enceladus", "saturn", 1.0, 15.0, 0.015, 0xffffff),
    MoonSpec::new("miranda", "uranus", 0.8, 10.0, 0.02, 0x9999ff),
    MoonSpec::new("triton", "neptune", 1.2, 12.0, 0.018, 0x8888ff),
];
