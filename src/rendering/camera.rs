use bevy::prelude::*;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::srgb(0.06, 0.06, 0.08)))
            .add_systems(Startup, setup_camera);
    }
}

/// Centered, unscaled 2D camera: one world unit per logical pixel.
fn setup_camera(mut commands: Commands) {
    commands.spawn((Camera2d, Name::new("MainCamera")));
}
