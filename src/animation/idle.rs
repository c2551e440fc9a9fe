//! Idle-straighten: bodies that sit still long enough rotate back upright.

use std::f32::consts::{PI, TAU};

use bevy::prelude::*;
use bevy_rapier2d::prelude::Velocity;

use crate::animation::tween::{Easing, Tween};
use crate::core::components::{BallInteraction, SkillBall};
use crate::core::config::{GameConfig, IdleConfig};
use crate::interaction::drag::ActiveDrag;

/// Tween of the physical angle toward zero.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct StraightenTween(pub Tween);

/// Wraps into (-PI, PI] so the shortest way home is taken.
pub fn normalize_angle(a: f32) -> f32 {
    let w = (a + PI).rem_euclid(TAU) - PI;
    if w <= -PI { w + TAU } else { w }
}

pub fn body_angle(tf: &Transform) -> f32 {
    tf.rotation.to_euler(EulerRot::ZYX).0
}

/// Speeds are compared per reference step, matching how the thresholds were tuned.
pub fn is_still(vel: &Velocity, cfg: &IdleConfig) -> bool {
    let hz = cfg.reference_step_hz.max(1.0);
    vel.linvel.length() / hz < cfg.stillness_threshold && vel.angvel.abs() / hz < cfg.stillness_threshold
}

/// After-step hook: samples stillness and starts the straighten tween once the
/// dwell completes.
pub fn detect_idle_bodies(
    mut commands: Commands,
    time: Res<Time>,
    cfg: Res<GameConfig>,
    drag: Res<ActiveDrag>,
    mut q: Query<
        (Entity, &Transform, &mut Velocity, &mut BallInteraction, Has<StraightenTween>),
        With<SkillBall>,
    >,
) {
    let now = time.elapsed_secs();
    for (entity, tf, mut vel, mut state, straightening) in &mut q {
        if state.splattered || straightening {
            continue;
        }
        if drag.is_held(entity) {
            state.idle_since = None;
            continue;
        }
        let still = is_still(&vel, &cfg.idle);
        if !state.observe_stillness(still, now, cfg.idle.dwell) {
            continue;
        }
        let angle = normalize_angle(body_angle(tf));
        if angle.abs() < 1e-4 {
            continue;
        }
        vel.angvel = 0.0;
        commands.entity(entity).insert(StraightenTween(Tween::new(
            angle,
            0.0,
            now,
            cfg.idle.straighten_duration,
            Easing::CubicOut,
        )));
        debug!(target: "skills", ?entity, angle, "straightening idle body");
    }
}

pub fn advance_straighten_tweens(
    mut commands: Commands,
    time: Res<Time>,
    mut q: Query<(Entity, &StraightenTween, &mut Transform, &mut Velocity, &BallInteraction)>,
) {
    let now = time.elapsed_secs();
    for (entity, tween, mut tf, mut vel, state) in &mut q {
        if state.splattered {
            commands.entity(entity).remove::<StraightenTween>();
            continue;
        }
        let s = tween.0.sample(now);
        tf.rotation = Quat::from_rotation_z(s.value);
        vel.angvel = 0.0;
        if s.done {
            commands.entity(entity).remove::<StraightenTween>();
        }
    }
}
