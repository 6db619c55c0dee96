//! Navigation controllers for the camera.
//!
//! A controller is registered with [`InputListeners`] when installed and must
//! be released before another one is installed, so only one controller ever
//! consumes input.

use std::f32::consts::{FRAC_PI_2, PI};

use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll};
use bevy::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControllerKind {
    Flight,
    Orbit,
}

/// Handle for one input registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Registry of controllers currently bound to input.
#[derive(Debug, Default)]
pub struct InputListeners {
    next_id: u64,
    registered: Vec<(ListenerId, ControllerKind)>,
}

impl InputListeners {
    pub fn register(&mut self, kind: ControllerKind) -> ListenerId {
        debug_assert!(
            self.registered.is_empty(),
            "{kind:?} controller registered while {:?} still holds input",
            self.registered
        );
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.registered.push((id, kind));
        id
    }

    /// Returns false if `id` was not registered.
    pub fn unregister(&mut self, id: ListenerId) -> bool {
        let before = self.registered.len();
        self.registered.retain(|(registered, _)| *registered != id);
        self.registered.len() != before
    }

    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }

    pub fn is_registered(&self, id: ListenerId) -> bool {
        self.registered.iter().any(|(registered, _)| *registered == id)
    }

    /// Kind of the controller holding input, if any.
    pub fn active_kind(&self) -> Option<ControllerKind> {
        self.registered.first().map(|(_, kind)| *kind)
    }
}

/// One frame of device state, reduced to what the controllers consume.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NavigationInput {
    /// Camera-local movement: +X right, +Y up, -Z forward.
    pub translate: Vec3,
    /// Roll, +1 rolls left.
    pub roll: f32,
    /// Keyboard look: x yaws left, y pitches up.
    pub turn: Vec2,
    /// Pointer movement this frame, in pixels.
    pub pointer_delta: Vec2,
    /// Any mouse button held.
    pub dragging: bool,
    /// Scroll this frame, positive away from the user.
    pub scroll: f32,
}

impl NavigationInput {
    pub fn from_devices(
        keys: &ButtonInput<KeyCode>,
        buttons: &ButtonInput<MouseButton>,
        motion: &AccumulatedMouseMotion,
        scroll: &AccumulatedMouseScroll,
    ) -> Self {
        let axis = |positive: KeyCode, negative: KeyCode| {
            keys.pressed(positive) as i8 as f32 - keys.pressed(negative) as i8 as f32
        };

        Self {
            translate: Vec3::new(
                axis(KeyCode::KeyD, KeyCode::KeyA),
                axis(KeyCode::KeyR, KeyCode::KeyF),
                axis(KeyCode::KeyS, KeyCode::KeyW),
            ),
            roll: axis(KeyCode::KeyQ, KeyCode::KeyE),
            turn: Vec2::new(
                axis(KeyCode::ArrowLeft, KeyCode::ArrowRight),
                axis(KeyCode::ArrowUp, KeyCode::ArrowDown),
            ),
            pointer_delta: motion.delta,
            dragging: buttons.get_pressed().next().is_some(),
            scroll: scroll.delta.y,
        }
    }
}

/// A camera navigation scheme bound to input while installed.
pub trait NavigationController: Send + Sync + 'static {
    fn kind(&self) -> ControllerKind;

    /// Registration held by this controller, `None` once released.
    fn listener(&self) -> Option<ListenerId>;

    /// Advance the camera by one frame. A released controller does nothing.
    fn update(&mut self, camera: &mut Transform, input: &NavigationInput, delta: f32);

    /// Unbind from input. Calling it again is a no-op.
    fn release(&mut self, listeners: &mut InputListeners);
}

fn release_listener(slot: &mut Option<ListenerId>, listeners: &mut InputListeners, kind: ControllerKind) {
    match slot.take() {
        Some(id) => {
            if !listeners.unregister(id) {
                warn!("{kind:?} controller listener {id:?} was already gone");
            }
        }
        None => debug!("{kind:?} controller already released"),
    }
}

/// Free-flight ("ship cockpit") parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct FlightSettings {
    /// Units per second.
    pub movement_speed: f32,
    /// Radians per second for keyboard roll and turns.
    pub roll_speed: f32,
    pub auto_forward: bool,
    /// Only look around with the mouse while a button is held.
    pub drag_to_look: bool,
    /// Radians per pixel of pointer movement.
    pub look_sensitivity: f32,
}

impl Default for FlightSettings {
    fn default() -> Self {
        Self {
            movement_speed: 100.0,
            roll_speed: PI / 5.0,
            auto_forward: false,
            drag_to_look: true,
            look_sensitivity: 0.003,
        }
    }
}

pub struct FlightController {
    settings: FlightSettings,
    listener: Option<ListenerId>,
}

impl FlightController {
    pub fn install(settings: FlightSettings, listeners: &mut InputListeners) -> Self {
        let listener = listeners.register(ControllerKind::Flight);
        Self {
            settings,
            listener: Some(listener),
        }
    }

    pub fn settings(&self) -> &FlightSettings {
        &self.settings
    }
}

impl NavigationController for FlightController {
    fn kind(&self) -> ControllerKind {
        ControllerKind::Flight
    }

    fn listener(&self) -> Option<ListenerId> {
        self.listener
    }

    fn update(&mut self, camera: &mut Transform, input: &NavigationInput, delta: f32) {
        if self.listener.is_none() {
            return;
        }

        let mut translate = input.translate;
        if self.settings.auto_forward && translate.z == 0.0 {
            translate.z = -1.0;
        }
        let step = camera.rotation * (translate * self.settings.movement_speed * delta);
        camera.translation += step;

        let turn_rate = self.settings.roll_speed * delta;
        let mut yaw = input.turn.x * turn_rate;
        let mut pitch = input.turn.y * turn_rate;
        if input.dragging || !self.settings.drag_to_look {
            yaw -= input.pointer_delta.x * self.settings.look_sensitivity;
            pitch -= input.pointer_delta.y * self.settings.look_sensitivity;
        }

        camera.rotate_local_y(yaw);
        camera.rotate_local_x(pitch);
        camera.rotate_local_z(input.roll * turn_rate);
    }

    fn release(&mut self, listeners: &mut InputListeners) {
        release_listener(&mut self.listener, listeners, ControllerKind::Flight);
    }
}

/// Orbit-around-target parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitSettings {
    pub target: Vec3,
    pub enable_damping: bool,
    /// Fraction of pending rotation applied per frame when damping.
    pub damping_factor: f32,
    /// Radians per pixel of drag.
    pub rotate_speed: f32,
    /// Fractional distance change per scroll step.
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 0.005,
            zoom_speed: 0.1,
            min_distance: 1.0,
            max_distance: 900.0,
        }
    }
}

/// Keeps the polar angle off the poles so `look_at` stays defined.
const MAX_PITCH: f32 = FRAC_PI_2 - 0.01;

pub struct OrbitController {
    settings: OrbitSettings,
    listener: Option<ListenerId>,
    distance: f32,
    yaw: f32,
    pitch: f32,
    /// Rotation still to be applied, decays with damping.
    pending: Vec2,
}

impl OrbitController {
    /// Start orbiting from wherever the camera currently is.
    pub fn install(
        camera: &Transform,
        settings: OrbitSettings,
        listeners: &mut InputListeners,
    ) -> Self {
        let offset = camera.translation - settings.target;
        let distance = offset
            .length()
            .clamp(settings.min_distance, settings.max_distance);
        let (yaw, pitch) = if offset.length_squared() > 0.0 {
            let dir = offset.normalize();
            (dir.x.atan2(dir.z), dir.y.asin().clamp(-MAX_PITCH, MAX_PITCH))
        } else {
            (0.0, 0.0)
        };

        let listener = listeners.register(ControllerKind::Orbit);
        Self {
            settings,
            listener: Some(listener),
            distance,
            yaw,
            pitch,
            pending: Vec2::ZERO,
        }
    }

    pub fn settings(&self) -> &OrbitSettings {
        &self.settings
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    fn offset(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw) * self.distance
    }
}

impl NavigationController for OrbitController {
    fn kind(&self) -> ControllerKind {
        ControllerKind::Orbit
    }

    fn listener(&self) -> Option<ListenerId> {
        self.listener
    }

    fn update(&mut self, camera: &mut Transform, input: &NavigationInput, _delta: f32) {
        if self.listener.is_none() {
            return;
        }

        if input.dragging {
            self.pending -= input.pointer_delta * self.settings.rotate_speed;
        }
        if input.scroll != 0.0 {
            let zoom = (1.0 - input.scroll * self.settings.zoom_speed).max(0.1);
            self.distance = (self.distance * zoom)
                .clamp(self.settings.min_distance, self.settings.max_distance);
        }

        let step = if self.settings.enable_damping {
            let step = self.pending * self.settings.damping_factor;
            self.pending -= step;
            step
        } else {
            std::mem::take(&mut self.pending)
        };
        self.yaw += step.x;
        self.pitch = (self.pitch - step.y).clamp(-MAX_PITCH, MAX_PITCH);

        camera.translation = self.settings.target + self.offset();
        camera.look_at(self.settings.target, Vec3::Y);
    }

    fn release(&mut self, listeners: &mut InputListeners) {
        release_listener(&mut self.listener, listeners, ControllerKind::Orbit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn camera_at(z: f32) -> Transform {
        Transform::from_xyz(0.0, 0.0, z)
    }

    #[test]
    fn test_flight_defaults() {
        let settings = FlightSettings::default();
        assert_eq!(settings.movement_speed, 100.0);
        assert_abs_diff_eq!(settings.roll_speed, PI / 5.0);
        assert!(!settings.auto_forward);
        assert!(settings.drag_to_look);
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut listeners = InputListeners::default();
        let mut flight = FlightController::install(FlightSettings::default(), &mut listeners);
        assert_eq!(listeners.len(), 1);

        flight.release(&mut listeners);
        flight.release(&mut listeners);
        assert!(listeners.is_empty());
        assert!(flight.listener().is_none());
    }

    #[test]
    fn test_listener_ids_are_unique() {
        let mut listeners = InputListeners::default();
        let mut first = FlightController::install(FlightSettings::default(), &mut listeners);
        let first_id = first.listener().unwrap();
        first.release(&mut listeners);

        let second = OrbitController::install(&camera_at(100.0), OrbitSettings::default(), &mut listeners);
        assert_ne!(second.listener(), Some(first_id));
        assert!(!listeners.is_registered(first_id));
        assert_eq!(listeners.active_kind(), Some(ControllerKind::Orbit));
    }

    #[test]
    fn test_flight_moves_forward_along_view() {
        let mut listeners = InputListeners::default();
        let mut flight = FlightController::install(FlightSettings::default(), &mut listeners);
        let mut camera = camera_at(100.0);
        let input = NavigationInput {
            translate: Vec3::NEG_Z,
            ..default()
        };

        flight.update(&mut camera, &input, 0.5);
        assert_abs_diff_eq!(camera.translation.z, 50.0, epsilon = 1e-4);
        assert_abs_diff_eq!(camera.translation.x, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_flight_ignores_pointer_without_drag() {
        let mut listeners = InputListeners::default();
        let mut flight = FlightController::install(FlightSettings::default(), &mut listeners);
        let mut camera = camera_at(100.0);
        let input = NavigationInput {
            pointer_delta: Vec2::new(40.0, 10.0),
            ..default()
        };

        flight.update(&mut camera, &input, 0.016);
        assert_eq!(camera.rotation, Quat::IDENTITY);

        let dragged = NavigationInput {
            dragging: true,
            ..input
        };
        flight.update(&mut camera, &dragged, 0.016);
        assert_ne!(camera.rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_released_controller_ignores_input() {
        let mut listeners = InputListeners::default();
        let mut flight = FlightController::install(FlightSettings::default(), &mut listeners);
        flight.release(&mut listeners);

        let mut camera = camera_at(100.0);
        let input = NavigationInput {
            translate: Vec3::NEG_Z,
            roll: 1.0,
            ..default()
        };
        flight.update(&mut camera, &input, 1.0);
        assert_eq!(camera, camera_at(100.0));
    }

    #[test]
    fn test_orbit_keeps_distance_while_rotating() {
        let mut listeners = InputListeners::default();
        let mut camera = camera_at(100.0);
        let mut orbit = OrbitController::install(&camera, OrbitSettings::default(), &mut listeners);

        let drag = NavigationInput {
            dragging: true,
            pointer_delta: Vec2::new(50.0, 20.0),
            ..default()
        };
        orbit.update(&mut camera, &drag, 0.016);
        for _ in 0..10 {
            orbit.update(&mut camera, &NavigationInput::default(), 0.016);
        }

        assert_abs_diff_eq!(camera.translation.length(), 100.0, epsilon = 1e-2);
        assert!(camera.translation.x.abs() > 1e-3);
    }

    #[test]
    fn test_orbit_damping_carries_inertia() {
        let mut listeners = InputListeners::default();
        let mut camera = camera_at(100.0);
        let mut orbit = OrbitController::install(&camera, OrbitSettings::default(), &mut listeners);

        let drag = NavigationInput {
            dragging: true,
            pointer_delta: Vec2::new(100.0, 0.0),
            ..default()
        };
        orbit.update(&mut camera, &drag, 0.016);
        let after_drag = camera.translation;

        orbit.update(&mut camera, &NavigationInput::default(), 0.016);
        assert_ne!(camera.translation, after_drag, "rotation should continue after release");
    }

    #[test]
    fn test_orbit_without_damping_stops_immediately() {
        let mut listeners = InputListeners::default();
        let mut camera = camera_at(100.0);
        let settings = OrbitSettings {
            enable_damping: false,
            ..default()
        };
        let mut orbit = OrbitController::install(&camera, settings, &mut listeners);

        let drag = NavigationInput {
            dragging: true,
            pointer_delta: Vec2::new(100.0, 0.0),
            ..default()
        };
        orbit.update(&mut camera, &drag, 0.016);
        let after_drag = camera.translation;

        orbit.update(&mut camera, &NavigationInput::default(), 0.016);
        assert_abs_diff_eq!(camera.translation.distance(after_drag), 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_orbit_zoom_is_clamped() {
        let mut listeners = InputListeners::default();
        let mut camera = camera_at(100.0);
        let mut orbit = OrbitController::install(&camera, OrbitSettings::default(), &mut listeners);

        let zoom_in = NavigationInput {
            scroll: 5.0,
            ..default()
        };
        for _ in 0..200 {
            orbit.update(&mut camera, &zoom_in, 0.016);
        }
        assert_abs_diff_eq!(orbit.distance(), OrbitSettings::default().min_distance);
    }

    #[test]
    fn test_input_from_devices() {
        let mut keys = ButtonInput::<KeyCode>::default();
        keys.press(KeyCode::KeyW);
        keys.press(KeyCode::KeyQ);
        keys.press(KeyCode::ArrowUp);
        let mut buttons = ButtonInput::<MouseButton>::default();
        buttons.press(MouseButton::Left);
        let motion = AccumulatedMouseMotion {
            delta: Vec2::new(3.0, -2.0),
        };
        let scroll = AccumulatedMouseScroll::default();

        let input = NavigationInput::from_devices(&keys, &buttons, &motion, &scroll);
        assert_eq!(input.translate, Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(input.roll, 1.0);
        assert_eq!(input.turn, Vec2::new(0.0, 1.0));
        assert!(input.dragging);
        assert_eq!(input.pointer_delta, Vec2::new(3.0, -2.0));
        assert_eq!(input.scroll, 0.0);
    }
}
