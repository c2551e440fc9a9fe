#[cfg(feature = "debug")]
use bevy::prelude::*;

#[cfg(feature = "debug")]
use crate::core::components::{BallInteraction, Skill, SkillBall};
#[cfg(feature = "debug")]
use crate::interaction::drag::ActiveDrag;
#[cfg(feature = "debug")]
use crate::interaction::hover::HoverState;
#[cfg(feature = "debug")]
use crate::rendering::popup::PopupPresenter;
#[cfg(feature = "debug")]
use crate::rendering::splatter_layer::SplatterLayer;

#[cfg(feature = "debug")]
#[derive(Resource, Debug)]
pub struct DebugState {
    pub frame_counter: u64,
    pub time_accum: f32,
    pub log_interval: f32,
}

#[cfg(feature = "debug")]
impl Default for DebugState {
    fn default() -> Self {
        Self {
            frame_counter: 0,
            time_accum: 0.0,
            log_interval: 2.0,
        }
    }
}

#[cfg(feature = "debug")]
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct DebugStats {
    pub fps: f32,
    pub frame_time_ms: f32,
    pub bodies: usize,
    pub splattered: usize,
    pub painted: usize,
    pub held: Option<String>,
    pub hovered: Option<String>,
    pub popup_open: bool,
}

#[cfg(feature = "debug")]
#[allow(clippy::too_many_arguments)]
pub fn debug_stats_collect_system(
    time: Res<Time>,
    mut state: ResMut<DebugState>,
    mut stats: ResMut<DebugStats>,
    q_balls: Query<(&Skill, &BallInteraction), With<SkillBall>>,
    drag: Res<ActiveDrag>,
    hover: Res<HoverState>,
    popup: Res<PopupPresenter>,
    layer: Res<SplatterLayer>,
) {
    state.frame_counter += 1;
    let dt = time.delta_secs().max(1e-6);
    let inst_fps = 1.0 / dt;
    stats.fps = if stats.fps == 0.0 { inst_fps } else { stats.fps * 0.9 + inst_fps * 0.1 };
    let inst_ms = dt * 1000.0;
    stats.frame_time_ms = if stats.frame_time_ms == 0.0 {
        inst_ms
    } else {
        stats.frame_time_ms * 0.9 + inst_ms * 0.1
    };
    let label_of = |e: Option<Entity>| e.and_then(|e| q_balls.get(e).ok()).map(|(s, _)| s.label.clone());
    stats.bodies = q_balls.iter().count();
    stats.splattered = q_balls.iter().filter(|(_, st)| st.splattered).count();
    stats.painted = layer.painted_count();
    stats.held = label_of(drag.entity);
    stats.hovered = label_of(hover.current);
    stats.popup_open = popup.is_open();
}
