pub mod flip;
pub mod idle;
pub mod splatter;
pub mod tween;

use bevy::prelude::*;

use crate::core::system::{AfterStepSet, AnimationSet};

/// Per-body tweens on the frame clock plus the idle detector on the physics
/// after-step hook.
pub struct AnimationPlugin;

impl Plugin for AnimationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                flip::advance_flip_tweens,
                idle::advance_straighten_tweens,
                splatter::advance_splatter_bursts,
            )
                .in_set(AnimationSet),
        )
        .add_systems(PostUpdate, idle::detect_idle_bodies.in_set(AfterStepSet));
    }
}
