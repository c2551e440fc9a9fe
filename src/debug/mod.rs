//! Debug module: feature gated stats logging and gizmo overlays.
//! Built only when compiled with `--features debug`.

#[cfg(feature = "debug")]
mod logging;
#[cfg(feature = "debug")]
pub mod stats;

#[cfg(feature = "debug")]
use bevy::prelude::*;

#[cfg(feature = "debug")]
use crate::core::config::GameConfig;
#[cfg(feature = "debug")]
use crate::core::system::RenderSyncSet;
#[cfg(feature = "debug")]
use crate::core::viewport::{PlayArea, Viewport};

#[cfg(feature = "debug")]
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct DebugPreRenderSet;

#[cfg(feature = "debug")]
pub struct DebugPlugin;
#[cfg(feature = "debug")]
impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        use crate::core::components::{BallRadius, Boundary};
        use crate::interaction::drag::ActiveDrag;
        use crate::interaction::hover::HoverState;
        use crate::interaction::pointer::PointerTracker;
        use logging::debug_logging_system;
        use stats::debug_stats_collect_system;

        /// Play area outline, wall boxes, held and hovered bodies.
        #[allow(clippy::too_many_arguments)]
        fn debug_arena_gizmos(
            mut gizmos: Gizmos,
            vp: Res<Viewport>,
            cfg: Res<GameConfig>,
            drag: Res<ActiveDrag>,
            hover: Res<HoverState>,
            tracker: Res<PointerTracker>,
            bodies: Query<(&Transform, &BallRadius)>,
            walls: Query<&Transform, With<Boundary>>,
        ) {
            let area = PlayArea::from_viewport(&vp, &cfg.play_area);
            let center = vp.screen_to_world(area.rect.center());
            gizmos.rect_2d(center, area.rect.size(), Color::srgb(0.2, 0.8, 0.3));
            for tf in &walls {
                gizmos.cross_2d(tf.translation.truncate(), 12.0, Color::srgb(0.8, 0.3, 0.2));
            }
            if let Some((tf, r)) = hover.current.and_then(|e| bodies.get(e).ok()) {
                gizmos.circle_2d(tf.translation.truncate(), r.0 + 6.0, Color::srgb(0.3, 0.6, 1.0));
            }
            if let Some((tf, r)) = drag.entity.and_then(|e| bodies.get(e).ok()) {
                let body = tf.translation.truncate();
                gizmos.circle_2d(body, r.0 + 10.0, Color::srgb(1.0, 1.0, 0.2));
                if let Some(p) = tracker.position {
                    gizmos.line_2d(body, vp.screen_to_world(p), Color::srgb(1.0, 0.5, 0.0));
                }
            }
        }

        app.init_resource::<stats::DebugState>()
            .init_resource::<stats::DebugStats>()
            .configure_sets(Update, DebugPreRenderSet.after(RenderSyncSet))
            .add_systems(
                Update,
                (debug_stats_collect_system, debug_logging_system, debug_arena_gizmos)
                    .chain()
                    .in_set(DebugPreRenderSet),
            );
    }
}

#[cfg(not(feature = "debug"))]
pub struct DebugPlugin;
#[cfg(not(feature = "debug"))]
impl bevy::prelude::Plugin for DebugPlugin {
    fn build(&self, _app: &mut bevy::prelude::App) {}
}
