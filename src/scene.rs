//! Scene graph assembly.
//!
//! Turns the catalog into nodes: the star and its light at the origin, one
//! node per planet with its orbit line, and a pivot per moon parented to its
//! planet so moons follow the planet while the pivot spins. The camera and
//! its rig are spawned last.

use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;

use crate::animation::AnimationSettings;
use crate::camera::{CameraRig, spawn_camera};
use crate::catalog::{Catalog, MoonSpec};
use crate::orbit::OrbitPath;
use crate::types::{SceneNode, SimulationClock};

/// Placement and normalization constants for assembly.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct AssemblySettings {
    /// Base distance of the first planet.
    pub initial_distance: f32,
    /// Added to the base distance after each planet.
    pub distance_step: f32,
    /// Divisor turning catalog periapsis/apoapsis into shape factors.
    pub factor_normalization: f32,
    /// Divisor turning catalog orbit speed into radians per simulated unit.
    pub speed_divisor: f32,
    pub star_radius_divisor: f32,
    pub planet_radius_divisor: f32,
    pub light_intensity: f32,
    pub light_range: f32,
}

impl Default for AssemblySettings {
    fn default() -> Self {
        Self {
            initial_distance: 30.0,
            distance_step: 30.0,
            factor_normalization: 120.0,
            speed_divisor: 30.0,
            star_radius_divisor: 30.0,
            planet_radius_divisor: 5.0,
            light_intensity: 2.0e9,
            light_range: 2000.0,
        }
    }
}

/// A sphere in the scene.
#[derive(Component, Clone, Debug)]
pub struct Body {
    pub name: String,
    /// Radius in scene units.
    pub radius: f32,
}

/// How a body's surface is drawn.
#[derive(Component, Clone, Debug, PartialEq)]
pub enum Surface {
    Texture(String),
    Color(Color),
}

/// Elliptical motion of a planet around the origin.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct OrbitalMotion {
    pub base_distance: f32,
    /// Radians per simulated unit.
    pub speed: f32,
    /// Horizontal shape factor.
    pub f1: f32,
    /// Vertical shape factor.
    pub f2: f32,
}

/// Rotation anchor carrying one moon.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct MoonPivot {
    /// Radians added every frame.
    pub speed: f32,
    /// Accumulated spin about the pivot's Y axis, in `[0, 2π)`.
    pub angle: f32,
    /// Fixed rotation about X applied before the spin.
    pub tilt: f32,
}

impl MoonPivot {
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_x(self.tilt) * Quat::from_rotation_y(self.angle)
    }
}

#[derive(Component, Clone, Debug)]
pub struct Moon {
    pub name: String,
    pub planet: Entity,
    pub pivot: Entity,
    /// Fixed local distance from the pivot.
    pub offset: f32,
}

/// Light source co-located with the star.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct StarLight {
    pub intensity: f32,
    pub range: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlanetNodes {
    pub name: String,
    pub node: Entity,
    pub orbit_line: Entity,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MoonNodes {
    pub name: String,
    pub planet: Entity,
    pub pivot: Entity,
    pub node: Entity,
}

/// Every node spawned by one assembly.
#[derive(Clone, Debug, PartialEq)]
pub struct AssembledScene {
    pub star: Entity,
    pub light: Entity,
    pub camera: Entity,
    pub planets: Vec<PlanetNodes>,
    pub moons: Vec<MoonNodes>,
}

impl AssembledScene {
    pub fn planet(&self, name: &str) -> Option<&PlanetNodes> {
        self.planets.iter().find(|p| p.name == name)
    }

    pub fn moon(&self, name: &str) -> Option<&MoonNodes> {
        self.moons.iter().find(|m| m.name == name)
    }
}

/// Lifetime of one assembled scene: its nodes and the clock it animates by.
#[derive(Resource, Default, Debug)]
pub struct SimulationContext {
    scene: Option<AssembledScene>,
    clock: Option<SimulationClock>,
}

impl SimulationContext {
    pub fn is_assembled(&self) -> bool {
        self.scene.is_some()
    }

    pub fn scene(&self) -> Option<&AssembledScene> {
        self.scene.as_ref()
    }

    pub fn clock(&self) -> Option<SimulationClock> {
        self.clock
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("scene is already assembled; tear it down before assembling again")]
    AlreadyAssembled,

    #[error("planet {name} does not orbit outside the planet before it")]
    NotOutward { name: String },
}

/// Spawn the scene for `catalog` and record it in the [`SimulationContext`].
///
/// Refuses to run twice on the same context.
pub fn assemble(
    world: &mut World,
    catalog: &Catalog,
    settings: &AssemblySettings,
) -> Result<AssembledScene, SceneError> {
    if world
        .get_resource::<SimulationContext>()
        .is_some_and(SimulationContext::is_assembled)
    {
        return Err(SceneError::AlreadyAssembled);
    }
    check_outward(catalog, settings)?;

    let star_spec = catalog.star();
    let upright = Quat::from_rotation_x(FRAC_PI_2);
    let star = world
        .spawn((
            SceneNode::Star,
            Body {
                name: star_spec.name.to_string(),
                radius: star_spec.mean_radius / settings.star_radius_divisor,
            },
            Surface::Texture(star_spec.texture_path()),
            Transform::from_rotation(upright),
            Visibility::default(),
            Name::new(star_spec.name),
        ))
        .id();
    let light = world
        .spawn((
            SceneNode::StarLight,
            StarLight {
                intensity: settings.light_intensity,
                range: settings.light_range,
            },
            Transform::default(),
            Visibility::default(),
            Name::new(format!("{} light", star_spec.name)),
        ))
        .id();

    let mut planets = Vec::with_capacity(catalog.planets().len());
    let mut moons = Vec::with_capacity(catalog.moons().len());
    let mut base_distance = settings.initial_distance;

    for spec in catalog.planets() {
        // Validated by the catalog.
        let (Some(periapsis), Some(apoapsis)) = (spec.periapsis, spec.apoapsis) else {
            continue;
        };
        let motion = OrbitalMotion {
            base_distance,
            speed: spec.orbit_speed / settings.speed_divisor,
            f1: apoapsis / settings.factor_normalization,
            f2: periapsis / settings.factor_normalization,
        };

        let node = world
            .spawn((
                SceneNode::Planet,
                Body {
                    name: spec.name.to_string(),
                    radius: spec.mean_radius / settings.planet_radius_divisor,
                },
                Surface::Texture(spec.texture_path()),
                motion,
                Transform::from_xyz(motion.f1 * base_distance, 0.0, 0.0).with_rotation(upright),
                Visibility::default(),
                Name::new(spec.name),
            ))
            .id();

        let orbit_line = world
            .spawn((
                SceneNode::OrbitLine,
                OrbitPath::build(base_distance, motion.f1, motion.f2),
                Transform::default(),
                Name::new(format!("{} orbit", spec.name)),
            ))
            .id();

        for moon in catalog.moons_of(spec.name) {
            moons.push(spawn_moon(world, node, moon));
        }

        planets.push(PlanetNodes {
            name: spec.name.to_string(),
            node,
            orbit_line,
        });
        base_distance += settings.distance_step;
    }

    let camera = spawn_camera(world);

    let time_scale = world
        .get_resource::<AnimationSettings>()
        .map(|s| s.time_scale)
        .unwrap_or_else(|| AnimationSettings::default().time_scale);
    let started_at = world
        .get_resource::<Time>()
        .map(|t| t.elapsed())
        .unwrap_or_default();

    let scene = AssembledScene {
        star,
        light,
        camera,
        planets,
        moons,
    };
    let mut context = world.get_resource_or_insert_with(SimulationContext::default);
    context.scene = Some(scene.clone());
    context.clock = Some(SimulationClock::new(started_at, time_scale));

    Ok(scene)
}

/// Semi-major distance of each planet, in catalog order.
pub fn semi_major_distances<'a>(
    catalog: &'a Catalog,
    settings: &'a AssemblySettings,
) -> impl Iterator<Item = (&'static str, f32)> + 'a {
    catalog.planets().iter().enumerate().map(|(index, spec)| {
        let base_distance = settings.initial_distance + index as f32 * settings.distance_step;
        let widest = spec.periapsis.unwrap_or(0.0).max(spec.apoapsis.unwrap_or(0.0));
        (spec.name, base_distance * widest / settings.factor_normalization)
    })
}

/// Every planet's ellipse must reach further out than the one before it.
fn check_outward(catalog: &Catalog, settings: &AssemblySettings) -> Result<(), SceneError> {
    let mut inner = f32::NEG_INFINITY;
    for (name, semi_major) in semi_major_distances(catalog, settings) {
        if semi_major <= inner {
            return Err(SceneError::NotOutward {
                name: name.to_string(),
            });
        }
        inner = semi_major;
    }
    Ok(())
}

fn spawn_moon(world: &mut World, planet: Entity, spec: &MoonSpec) -> MoonNodes {
    let pivot = MoonPivot {
        speed: spec.speed,
        angle: 0.0,
        tilt: spec.tilt,
    };
    let pivot_node = world
        .spawn((
            SceneNode::Pivot,
            pivot,
            Transform::from_rotation(pivot.rotation()),
            Visibility::default(),
            ChildOf(planet),
            Name::new(format!("{} pivot", spec.name)),
        ))
        .id();

    let node = world
        .spawn((
            SceneNode::Moon,
            Moon {
                name: spec.name.to_string(),
                planet,
                pivot: pivot_node,
                offset: spec.distance,
            },
            Body {
                name: spec.name.to_string(),
                radius: spec.radius,
            },
            Surface::Color(spec.srgb()),
            Transform::from_xyz(spec.distance, 0.0, 0.0),
            Visibility::default(),
            ChildOf(pivot_node),
            Name::new(spec.name),
        ))
        .id();

    MoonNodes {
        name: spec.name.to_string(),
        planet,
        pivot: pivot_node,
        node,
    }
}

/// Despawn every node of the assembled scene and unbind the camera rig.
///
/// Returns false if nothing was assembled.
pub fn teardown(world: &mut World) -> bool {
    let Some(scene) = world
        .get_resource_mut::<SimulationContext>()
        .and_then(|mut context| {
            context.clock = None;
            context.scene.take()
        })
    else {
        return false;
    };

    if let Some(mut rig) = world.remove_resource::<CameraRig>() {
        rig.release();
        if let Some(ship) = rig.ship().entity() {
            if world.entities().contains(ship) {
                world.despawn(ship);
            }
        }
    }

    let roots = [scene.star, scene.light, scene.camera]
        .into_iter()
        .chain(scene.planets.iter().flat_map(|p| [p.node, p.orbit_line]));
    for entity in roots {
        // Despawning a planet takes its pivots and moons with it.
        world.despawn(entity);
    }

    info!("Scene torn down");
    true
}

/// Plugin assembling the scene at startup from the [`Catalog`] resource.
pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AssemblySettings>()
            .init_resource::<SimulationContext>()
            .add_systems(Startup, setup_scene);
    }
}

fn setup_scene(world: &mut World) {
    let Some(catalog) = world.get_resource::<Catalog>().cloned() else {
        error!("No catalog resource; the scene was not assembled");
        return;
    };
    let settings = world
        .get_resource::<AssemblySettings>()
        .cloned()
        .unwrap_or_default();

    match assemble(world, &catalog, &settings) {
        Ok(scene) => info!(
            "Assembled {} planets and {} moons around {}",
            scene.planets.len(),
            scene.moons.len(),
            catalog.star().name
        ),
        Err(err) => error!("Scene assembly failed: {err}"),
    }
}
