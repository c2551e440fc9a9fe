use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::core::config::GameConfig;

/// Pixel-scale Rapier world with downward gravity from config.
pub struct PhysicsSetupPlugin;

impl Plugin for PhysicsSetupPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(100.0),
            RapierDebugRenderPlugin {
                enabled: false,
                ..default()
            },
        ))
        .add_systems(Update, (configure_gravity, sync_collider_outlines));
    }
}

/// The Rapier context is a component spawned by the plugin, so keep trying
/// until it exists, then apply once.
fn configure_gravity(mut q_cfg: Query<&mut RapierConfiguration>, game_cfg: Res<GameConfig>, mut done: Local<bool>) {
    if *done && !game_cfg.is_changed() {
        return;
    }
    if let Ok(mut cfg) = q_cfg.single_mut() {
        // config is screen-space (y down); world y points up
        cfg.gravity = Vect::new(0.0, -game_cfg.balls.gravity);
        *done = true;
        info!(target: "skills", gravity = game_cfg.balls.gravity, "physics gravity configured");
    }
}

/// Collider outlines follow `rapier_debug`, including after a hot reload.
fn sync_collider_outlines(game_cfg: Res<GameConfig>, ctx: Option<ResMut<DebugRenderContext>>) {
    if !game_cfg.is_changed() {
        return;
    }
    if let Some(mut c) = ctx {
        if c.enabled != game_cfg.rapier_debug {
            c.enabled = game_cfg.rapier_debug;
        }
    }
}
