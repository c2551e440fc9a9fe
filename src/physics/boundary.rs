use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::core::components::Boundary;
use crate::core::config::{GameConfig, PlayAreaConfig};
use crate::core::viewport::{PlayArea, Viewport};

/// Replaces the four walls whenever the viewport or the play-area insets
/// change. Walls are never edited in place, and dynamic bodies are left where
/// they are.
pub fn rebuild_boundaries(
    mut commands: Commands,
    vp: Res<Viewport>,
    cfg: Res<GameConfig>,
    existing: Query<Entity, With<Boundary>>,
    mut built_for: Local<Option<PlayAreaConfig>>,
) {
    let insets_changed = built_for.as_ref() != Some(&cfg.play_area);
    if !vp.is_changed() && !insets_changed {
        return;
    }
    *built_for = Some(cfg.play_area.clone());
    let removed = existing.iter().count();
    for e in &existing {
        commands.entity(e).despawn();
    }
    let area = PlayArea::from_viewport(&vp, &cfg.play_area);
    for wall in area.walls() {
        let center = vp.screen_to_world(wall.center);
        commands.spawn((
            wall.side,
            RigidBody::Fixed,
            Collider::cuboid(wall.half_extents.x, wall.half_extents.y),
            Transform::from_xyz(center.x, center.y, 0.0),
            Name::new(format!("Wall:{:?}", wall.side)),
        ));
    }
    info!(
        target: "skills",
        width = vp.width,
        height = vp.height,
        removed,
        "boundary walls rebuilt"
    );
}
