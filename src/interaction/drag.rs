//! Held-body constraint: a damped spring from the body toward the pointer.

use bevy::prelude::*;
use bevy_rapier2d::prelude::Velocity;

use crate::animation::idle::StraightenTween;
use crate::core::components::{BallInteraction, BallRadius};
use crate::core::config::{DragConfig, GameConfig};
use crate::core::viewport::{PlayArea, Viewport};
use crate::interaction::pointer::PointerTracker;

#[derive(Resource, Default, Debug, Clone, Copy, PartialEq)]
pub struct ActiveDrag {
    pub entity: Option<Entity>,
    /// Body center minus the grab point, world units.
    pub offset: Vec2,
}

impl ActiveDrag {
    pub fn grab(&mut self, entity: Entity, offset: Vec2) {
        self.entity = Some(entity);
        self.offset = offset;
    }

    pub fn release(&mut self) -> Option<Entity> {
        self.offset = Vec2::ZERO;
        self.entity.take()
    }

    pub fn is_held(&self, entity: Entity) -> bool {
        self.entity == Some(entity)
    }
}

/// Velocity the spring asks for, px/s. `stiffness` is the fraction of the gap
/// closed per reference step; `damping` keeps that share of the old velocity.
pub fn spring_velocity(current: Vec2, gap: Vec2, cfg: &DragConfig, reference_hz: f32) -> Vec2 {
    let desired = gap * cfg.stiffness * reference_hz;
    let v = desired.lerp(current, cfg.damping.clamp(0.0, 1.0));
    if cfg.max_speed > 0.0 {
        v.clamp_length_max(cfg.max_speed)
    } else {
        v
    }
}

pub fn apply_drag_force(
    mut commands: Commands,
    time: Res<Time>,
    tracker: Res<PointerTracker>,
    vp: Res<Viewport>,
    cfg: Res<GameConfig>,
    mut drag: ResMut<ActiveDrag>,
    mut q: Query<(&Transform, &mut Velocity, &mut BallInteraction, Has<StraightenTween>)>,
) {
    let Some(entity) = drag.entity else {
        return;
    };
    let Some(pointer) = tracker.position else {
        return;
    };
    let Ok((tf, mut vel, mut state, straightening)) = q.get_mut(entity) else {
        drag.release();
        return;
    };
    if state.splattered {
        drag.release();
        return;
    }
    let target = vp.screen_to_world(pointer) + drag.offset;
    let gap = target - tf.translation.truncate();
    vel.linvel = spring_velocity(vel.linvel, gap, &cfg.drag, cfg.idle.reference_step_hz.max(1.0));
    state.note_motion(time.elapsed_secs());
    if straightening {
        commands.entity(entity).remove::<StraightenTween>();
    }
}

/// Runs right before the physics step: a hold whose pointer has wandered out of
/// the inset play area is dropped.
pub fn release_hold_outside_play_area(
    tracker: Res<PointerTracker>,
    vp: Res<Viewport>,
    cfg: Res<GameConfig>,
    mut drag: ResMut<ActiveDrag>,
    radii: Query<&BallRadius>,
) {
    let Some(entity) = drag.entity else {
        return;
    };
    let inside = match tracker.position {
        Some(p) => {
            let radius = radii.get(entity).map(|r| r.0).unwrap_or(0.0);
            PlayArea::from_viewport(&vp, &cfg.play_area).contains_inset(p, radius)
        }
        None => false,
    };
    if !inside {
        drag.release();
        debug!(target: "gesture", ?entity, "hold dropped outside play area");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spring_closes_stiffness_share_per_step() {
        let cfg = DragConfig {
            damping: 0.0,
            max_speed: 0.0,
            ..DragConfig::default()
        };
        let v = spring_velocity(Vec2::ZERO, Vec2::new(100.0, 0.0), &cfg, 60.0);
        // 20% of 100 px per 1/60 s
        assert!((v.x / 60.0 - 20.0).abs() < 1e-3);
    }

    #[test]
    fn damping_blends_old_velocity_and_speed_is_capped() {
        let cfg = DragConfig {
            damping: 0.5,
            max_speed: 0.0,
            ..DragConfig::default()
        };
        let v = spring_velocity(Vec2::new(0.0, 100.0), Vec2::ZERO, &cfg, 60.0);
        assert!((v.y - 50.0).abs() < 1e-3);
        let capped = DragConfig {
            max_speed: 300.0,
            ..DragConfig::default()
        };
        let v = spring_velocity(Vec2::ZERO, Vec2::new(10_000.0, 0.0), &capped, 60.0);
        assert!((v.length() - 300.0).abs() < 1e-2);
    }

    #[test]
    fn grab_and_release() {
        let mut d = ActiveDrag::default();
        let e = Entity::from_raw(4);
        d.grab(e, Vec2::new(1.0, 2.0));
        assert!(d.is_held(e));
        assert_eq!(d.release(), Some(e));
        assert_eq!(d.release(), None);
        assert_eq!(d.offset, Vec2::ZERO);
    }
}
