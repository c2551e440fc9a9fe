use std::f32::consts::PI;

use bevy::prelude::*;

use crate::animation::flip::start_flip;
use crate::core::components::{BallInteraction, BallRadius};
use crate::core::config::GameConfig;
use crate::core::viewport::Viewport;
use crate::gameplay::registry::BodyRegistry;
use crate::interaction::pointer::PointerTracker;

/// The one body (if any) whose label face is being revealed.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HoverState {
    pub current: Option<Entity>,
}

/// Hover picks the first live body under the pointer. A change flips the old
/// body back to its icon and the new one to its label, each from wherever its
/// flip currently is.
#[allow(clippy::too_many_arguments)]
pub fn update_hover(
    mut commands: Commands,
    time: Res<Time>,
    tracker: Res<PointerTracker>,
    vp: Res<Viewport>,
    cfg: Res<GameConfig>,
    registry: Res<BodyRegistry>,
    mut hover: ResMut<HoverState>,
    bodies: Query<(&Transform, &BallRadius, &BallInteraction)>,
) {
    let hovered = tracker.position.and_then(|p| {
        let world = vp.screen_to_world(p);
        registry.hit_test(world, |e| {
            let (tf, r, st) = bodies.get(e).ok()?;
            (!st.splattered).then(|| (tf.translation.truncate(), r.0))
        })
    });
    if hovered == hover.current {
        return;
    }
    let now = time.elapsed_secs();
    let duration = cfg.flip.duration;
    if let Some(old) = hover.current {
        if let Ok((_, _, st)) = bodies.get(old) {
            if !st.splattered {
                start_flip(&mut commands, old, st.flip_angle, 0.0, now, duration);
            }
        }
    }
    if let Some(new) = hovered {
        if let Ok((_, _, st)) = bodies.get(new) {
            start_flip(&mut commands, new, st.flip_angle, PI, now, duration);
        }
    }
    hover.current = hovered;
}
