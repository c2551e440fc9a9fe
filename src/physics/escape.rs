//! Recovery sweep for bodies the solver flung far off screen.

use bevy::prelude::*;
use bevy_rapier2d::prelude::Velocity;
use rand::Rng;

use crate::core::components::{BallInteraction, Skill, SkillBall};
use crate::core::config::GameConfig;
use crate::core::viewport::Viewport;

#[derive(Resource, Debug, Deref, DerefMut)]
pub struct EscapeSweep(pub Timer);

impl FromWorld for EscapeSweep {
    fn from_world(world: &mut World) -> Self {
        let secs = world
            .get_resource::<GameConfig>()
            .map(|c| c.escape.interval)
            .unwrap_or(3.0);
        Self(Timer::from_seconds(secs.max(0.01), TimerMode::Repeating))
    }
}

/// Random screen point in the upper half of the viewport.
pub fn recovery_position<R: Rng + ?Sized>(rng: &mut R, vp: &Viewport) -> Vec2 {
    let x = if vp.width > 0.0 { rng.gen_range(0.0..=vp.width) } else { 0.0 };
    let y = if vp.height > 0.0 { rng.gen_range(0.0..=vp.height * 0.5) } else { 0.0 };
    Vec2::new(x, y)
}

#[allow(clippy::type_complexity)]
pub fn sweep_escaped_bodies(
    time: Res<Time>,
    mut sweep: ResMut<EscapeSweep>,
    cfg: Res<GameConfig>,
    vp: Res<Viewport>,
    mut q: Query<(&Skill, &mut Transform, Option<&mut Velocity>, Option<&BallInteraction>), With<SkillBall>>,
) {
    sweep.tick(time.delta());
    if !sweep.just_finished() {
        return;
    }
    let mut rng = rand::thread_rng();
    for (skill, mut tf, vel, state) in &mut q {
        if state.is_some_and(|s| s.splattered) {
            continue;
        }
        let screen = vp.world_to_screen(tf.translation.truncate());
        if !vp.is_far_outside(screen, cfg.escape.slack) {
            continue;
        }
        let to = recovery_position(&mut rng, &vp);
        let world = vp.screen_to_world(to);
        tf.translation.x = world.x;
        tf.translation.y = world.y;
        if let Some(mut v) = vel {
            *v = Velocity::zero();
        }
        info!(
            target: "skills",
            label = %skill.label,
            from_x = screen.x,
            from_y = screen.y,
            "escaped body recovered"
        );
    }
}
