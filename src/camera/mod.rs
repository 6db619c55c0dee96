//! Camera rig for the solar system view.
//!
//! The rig is a two-state machine: free flight with the ship under the
//! camera, or orbiting the star with the ship detached. The toggle key swaps
//! between them, releasing the outgoing controller before installing the next.

pub mod controls;
pub mod ship;

use bevy::{
    input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll},
    prelude::*,
};

use self::controls::{
    ControllerKind, FlightController, FlightSettings, InputListeners, NavigationController,
    NavigationInput, OrbitController, OrbitSettings,
};
use self::ship::{ShipLoad, ShipSettings, ShipState, sync_ship_attachment};
use crate::types::{OrrerySet, SceneNode};

/// Marker component for the main camera.
#[derive(Component)]
pub struct MainCamera;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CameraMode {
    #[default]
    Flight,
    Orbit,
}

impl CameraMode {
    pub fn toggled(self) -> Self {
        match self {
            CameraMode::Flight => CameraMode::Orbit,
            CameraMode::Orbit => CameraMode::Flight,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            CameraMode::Flight => "Ship mode",
            CameraMode::Orbit => "Orbit mode",
        }
    }

    /// Key bindings for this mode.
    pub fn bindings(self) -> &'static [&'static str] {
        match self {
            CameraMode::Flight => &[
                "WASD: move",
                "Q/E: roll",
                "R/F: up/down",
                "Arrows or drag: look around",
            ],
            CameraMode::Orbit => &["Drag with the mouse to rotate", "Mouse wheel to zoom"],
        }
    }

    /// Key bindings followed by the hint for `toggle_key`.
    pub fn help_lines(self, toggle_key: KeyCode) -> Vec<String> {
        self.bindings()
            .iter()
            .map(|line| line.to_string())
            .chain(std::iter::once(format!("Press {toggle_key:?} to switch view")))
            .collect()
    }
}

/// Camera configuration.
#[derive(Resource, Clone, Debug)]
pub struct CameraSettings {
    pub toggle_key: KeyCode,
    pub start_position: Vec3,
    /// Vertical field of view.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub flight: FlightSettings,
    pub orbit: OrbitSettings,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            toggle_key: KeyCode::Enter,
            start_position: Vec3::new(0.0, 0.0, 100.0),
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            flight: FlightSettings::default(),
            orbit: OrbitSettings::default(),
        }
    }
}

/// The camera, its one active controller, and the ship slot.
#[derive(Resource)]
pub struct CameraRig {
    camera: Entity,
    mode: CameraMode,
    controller: Box<dyn NavigationController>,
    listeners: InputListeners,
    ship: ShipState,
    settings: CameraSettings,
}

impl CameraRig {
    /// Bind a rig to an existing camera, starting in flight mode.
    pub fn new(camera: Entity, settings: CameraSettings) -> Self {
        let mut listeners = InputListeners::default();
        let controller = FlightController::install(settings.flight.clone(), &mut listeners);
        Self {
            camera,
            mode: CameraMode::Flight,
            controller: Box::new(controller),
            listeners,
            ship: ShipState::default(),
            settings,
        }
    }

    pub fn camera(&self) -> Entity {
        self.camera
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    pub fn listeners(&self) -> &InputListeners {
        &self.listeners
    }

    pub fn controller_kind(&self) -> ControllerKind {
        self.controller.kind()
    }

    pub fn ship(&self) -> ShipState {
        self.ship
    }

    /// Whether the ship belongs under the camera in the current mode.
    pub fn ship_attached(&self) -> bool {
        self.mode == CameraMode::Flight
    }

    /// Flip the mode. `camera` is the camera's current transform, used to seed
    /// the orbit controller.
    pub fn toggle(&mut self, camera: &Transform) -> CameraMode {
        self.controller.release(&mut self.listeners);
        self.mode = self.mode.toggled();
        self.controller = match self.mode {
            CameraMode::Flight => Box::new(FlightController::install(
                self.settings.flight.clone(),
                &mut self.listeners,
            )),
            CameraMode::Orbit => Box::new(OrbitController::install(
                camera,
                self.settings.orbit.clone(),
                &mut self.listeners,
            )),
        };
        self.mode
    }

    pub fn update(&mut self, camera: &mut Transform, input: &NavigationInput, delta: f32) {
        self.controller.update(camera, input, delta);
    }

    /// Returns false if the ship load had already been resolved.
    pub fn resolve_ship(&mut self, outcome: ShipLoad) -> bool {
        self.ship.resolve(outcome)
    }

    /// Unbind the active controller from input. Used on teardown.
    pub fn release(&mut self) {
        self.controller.release(&mut self.listeners);
    }
}

/// Spawn the camera node and install its rig in flight mode.
pub fn spawn_camera(world: &mut World) -> Entity {
    let settings = world
        .get_resource::<CameraSettings>()
        .cloned()
        .unwrap_or_default();

    let camera = world
        .spawn((
            MainCamera,
            SceneNode::Camera,
            Transform::from_translation(settings.start_position),
            Visibility::default(),
            Name::new("Camera"),
        ))
        .id();

    world.insert_resource(CameraRig::new(camera, settings));
    camera
}

/// Plugin providing the camera state machine and navigation.
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraSettings>()
            .init_resource::<ShipSettings>()
            .add_systems(
                Update,
                toggle_view
                    .in_set(OrrerySet::Input)
                    .run_if(resource_exists::<CameraRig>),
            )
            .add_systems(
                Update,
                (sync_ship_attachment, drive_camera)
                    .chain()
                    .in_set(OrrerySet::Camera)
                    .run_if(resource_exists::<CameraRig>),
            );
    }
}

/// Swap controllers when the toggle key goes down.
fn toggle_view(
    keys: Res<ButtonInput<KeyCode>>,
    mut rig: ResMut<CameraRig>,
    cameras: Query<&Transform, With<MainCamera>>,
) {
    if !keys.just_pressed(rig.settings().toggle_key) {
        return;
    }

    let Ok(camera) = cameras.get(rig.camera()) else {
        return;
    };

    let mode = rig.toggle(camera);
    info!("Camera switched to {}", mode.title());
    for line in mode.help_lines(rig.settings().toggle_key) {
        info!("  {line}");
    }
}

/// Advance the active controller by the frame delta.
fn drive_camera(
    time: Res<Time>,
    keys: Res<ButtonInput<KeyCode>>,
    buttons: Res<ButtonInput<MouseButton>>,
    motion: Res<AccumulatedMouseMotion>,
    scroll: Res<AccumulatedMouseScroll>,
    mut rig: ResMut<CameraRig>,
    mut cameras: Query<&mut Transform, With<MainCamera>>,
) {
    let camera = rig.camera();
    let Ok(mut transform) = cameras.get_mut(camera) else {
        return;
    };

    let input = NavigationInput::from_devices(&keys, &buttons, &motion, &scroll);
    rig.update(&mut transform, &input, time.delta_secs());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig() -> (World, CameraRig) {
        let mut world = World::new();
        let camera = world.spawn_empty().id();
        (world, CameraRig::new(camera, CameraSettings::default()))
    }

    #[test]
    fn test_starts_in_flight() {
        let (_world, rig) = rig();
        assert_eq!(rig.mode(), CameraMode::Flight);
        assert_eq!(rig.controller_kind(), ControllerKind::Flight);
        assert_eq!(rig.listeners().len(), 1);
        assert!(rig.ship_attached());
    }

    #[test]
    fn test_toggle_swaps_controller() {
        let (_world, mut rig) = rig();
        let camera = Transform::from_xyz(0.0, 0.0, 100.0);

        assert_eq!(rig.toggle(&camera), CameraMode::Orbit);
        assert_eq!(rig.controller_kind(), ControllerKind::Orbit);
        assert_eq!(rig.listeners().active_kind(), Some(ControllerKind::Orbit));
        assert!(!rig.ship_attached());

        assert_eq!(rig.toggle(&camera), CameraMode::Flight);
        assert_eq!(rig.controller_kind(), ControllerKind::Flight);
        assert!(rig.ship_attached());
    }

    #[test]
    fn test_only_one_listener_across_toggles() {
        let (_world, mut rig) = rig();
        let camera = Transform::from_xyz(0.0, 0.0, 100.0);
        for _ in 0..25 {
            rig.toggle(&camera);
            assert_eq!(rig.listeners().len(), 1);
        }
    }

    #[test]
    fn test_release_then_toggle_still_installs_one() {
        let (_world, mut rig) = rig();
        rig.release();
        rig.release();
        assert!(rig.listeners().is_empty());

        rig.toggle(&Transform::default());
        assert_eq!(rig.listeners().len(), 1);
    }

    #[test]
    fn test_help_lines_end_with_toggle_hint() {
        let default_key = CameraSettings::default().toggle_key;
        for mode in [CameraMode::Flight, CameraMode::Orbit] {
            let lines = mode.help_lines(default_key);
            assert_eq!(lines.len(), mode.bindings().len() + 1);
            assert_eq!(lines.last().unwrap(), "Press Enter to switch view");
        }
    }

    #[test]
    fn test_help_lines_follow_configured_key() {
        let lines = CameraMode::Orbit.help_lines(KeyCode::Tab);
        assert_eq!(lines.last().unwrap(), "Press Tab to switch view");
        assert!(lines.iter().all(|line| !line.contains("Enter")));
    }
}
