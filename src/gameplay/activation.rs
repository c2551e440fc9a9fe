use bevy::prelude::*;
use bevy_rapier2d::prelude::Velocity;

use crate::animation::splatter::spawn_splatter_burst;
use crate::core::components::{BallColor, BallInteraction, BallRadius, Skill};
use crate::core::config::{GameConfig, SkillEntry};
use crate::core::viewport::Viewport;
use crate::gameplay::registry::BodyRegistry;
use crate::interaction::drag::ActiveDrag;
use crate::rendering::popup::PopupPresenter;
use crate::rendering::splatter_layer::{SplatterLayer, color_to_rgba8};

/// A click landed on a body.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyActivated {
    pub entity: Entity,
}

/// `"{label} ★★★☆☆\n{description}"`, or the fallback when the description is blank.
pub fn popup_text(skill: &SkillEntry, fallback: &str) -> String {
    let body = if skill.description.trim().is_empty() {
        fallback
    } else {
        skill.description.as_str()
    };
    format!("{} {}\n{}", skill.name, skill.star_line(), body)
}

/// First activation freezes the body and splatters it; every activation opens
/// the popup.
#[allow(clippy::too_many_arguments)]
pub fn handle_body_activated(
    mut commands: Commands,
    mut events: EventReader<BodyActivated>,
    time: Res<Time>,
    cfg: Res<GameConfig>,
    vp: Res<Viewport>,
    registry: Res<BodyRegistry>,
    mut layer: ResMut<SplatterLayer>,
    mut popup: ResMut<PopupPresenter>,
    mut drag: ResMut<ActiveDrag>,
    mut bodies: Query<(
        &Skill,
        &Transform,
        &BallRadius,
        &BallColor,
        &mut BallInteraction,
        Option<&mut Velocity>,
    )>,
) {
    let now = time.elapsed_secs();
    let mut rng = rand::thread_rng();
    for ev in events.read() {
        let Ok((skill, tf, radius, color, mut state, velocity)) = bodies.get_mut(ev.entity) else {
            continue;
        };
        if registry.mark_splattered(&mut commands, ev.entity, &mut state, velocity.map(|v| v.into_inner())) {
            if drag.entity == Some(ev.entity) {
                drag.release();
            }
            if layer.claim(ev.entity) {
                let center = vp.world_to_screen(tf.translation.truncate());
                spawn_splatter_burst(
                    &mut commands,
                    &mut rng,
                    &cfg.splatter,
                    ev.entity,
                    center,
                    radius.0,
                    color_to_rgba8(color.0),
                    now,
                );
            }
            info!(target: "skills", label = %skill.label, "body splattered");
        }
        let text = match cfg.skills.get(skill.index) {
            Some(entry) => popup_text(entry, &cfg.popup.fallback_text),
            None => {
                warn!(target: "popup", label = %skill.label, "skill entry missing; using fallback text");
                format!("{}\n{}", skill.label, cfg.popup.fallback_text)
            }
        };
        popup.open(ev.entity, text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popup_text_uses_stars_and_fallback() {
        let mut s = SkillEntry {
            name: "Rust".into(),
            stars: 3,
            description: "Systems.".into(),
            ..Default::default()
        };
        assert_eq!(popup_text(&s, "n/a"), "Rust ★★★☆☆\nSystems.");
        s.description = "   ".into();
        assert_eq!(popup_text(&s, "n/a"), "Rust ★★★☆☆\nn/a");
    }
}
