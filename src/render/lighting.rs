//! Scene-wide ambient light.
//!
//! The star's point light leaves night sides black; a dim ambient term keeps
//! them readable.

use bevy::prelude::*;

/// Plugin installing the ambient light.
pub struct LightingPlugin;

impl Plugin for LightingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AmbientSettings>()
            .add_systems(Startup, apply_ambient_light);
    }
}

/// Ambient light colour and strength.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct AmbientSettings {
    pub color: Color,
    pub brightness: f32,
}

impl Default for AmbientSettings {
    fn default() -> Self {
        Self {
            color: Color::srgb_u8(0x22, 0x22, 0x22),
            brightness: 200.0,
        }
    }
}

fn apply_ambient_light(mut commands: Commands, settings: Res<AmbientSettings>) {
    commands.insert_resource(GlobalAmbientLight {
        color: settings.color,
        brightness: settings.brightness,
        ..default()
    });
    info!("Ambient light set to {}", settings.brightness);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ambient_light() {
        let mut app = App::new();
        app.add_plugins(LightingPlugin);
        app.update();

        let light = app.world().resource::<GlobalAmbientLight>();
        let settings = AmbientSettings::default();
        assert_eq!(light.color, settings.color);
        assert_eq!(light.brightness, settings.brightness);
    }

    #[test]
    fn test_ambient_settings_override() {
        let mut app = App::new();
        app.insert_resource(AmbientSettings {
            color: Color::WHITE,
            brightness: 50.0,
        })
        .add_plugins(LightingPlugin);
        app.update();

        let light = app.world().resource::<GlobalAmbientLight>();
        assert_eq!(light.color, Color::WHITE);
        assert_eq!(light.brightness, 50.0);
    }
}
