use bevy::prelude::*;

use crate::animation::tween::{Easing, Tween};
use crate::core::components::BallInteraction;

/// In-flight flip of `BallInteraction::flip_angle`. Inserting a new one
/// replaces (cancels) the old.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct FlipTween(pub Tween);

impl FlipTween {
    pub fn target(&self) -> f32 {
        self.0.to
    }
}

/// Retargets the flip of `entity`, continuing from `current`.
pub fn start_flip(commands: &mut Commands, entity: Entity, current: f32, target: f32, now: f32, duration: f32) {
    commands
        .entity(entity)
        .try_insert(FlipTween(Tween::new(current, target, now, duration, Easing::CubicInOut)));
}

pub fn advance_flip_tweens(
    mut commands: Commands,
    time: Res<Time>,
    mut q: Query<(Entity, &FlipTween, &mut BallInteraction)>,
) {
    let now = time.elapsed_secs();
    for (entity, tween, mut state) in &mut q {
        // splattered bodies keep whatever angle they had
        if state.splattered {
            commands.entity(entity).remove::<FlipTween>();
            continue;
        }
        let s = tween.0.sample(now);
        state.flip_angle = s.value;
        if s.done {
            commands.entity(entity).remove::<FlipTween>();
        }
    }
}
