pub mod balls;
pub mod camera;
pub mod popup;
pub mod splatter_layer;

use bevy::prelude::*;

use balls::BallVisualsPlugin;
use camera::CameraPlugin;
use popup::PopupUiPlugin;
use splatter_layer::SplatterSpritePlugin;

/// Everything that draws. State-only parts (popup timer, paint layer) live in
/// their own plugins so they run without a renderer.
pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((CameraPlugin, BallVisualsPlugin, SplatterSpritePlugin, PopupUiPlugin));
    }
}
