//! Live body visuals: outline ring, filled disc and a two-sided face (icon /
//! label) that narrows with the flip angle.

use std::f32::consts::FRAC_PI_2;

use bevy::asset::LoadState;
use bevy::prelude::*;
use bevy::sprite::{ColorMaterial, MeshMaterial2d};

use crate::core::components::{
    BallCircleVisual, BallColor, BallFace, BallInteraction, BallOutlineVisual, BallRadius, FaceIcon, FaceLabel,
    Skill, SkillBall,
};
use crate::core::config::{GameConfig, parse_hex_color};
use crate::core::system::RenderSyncSet;

/// Face never collapses fully so the edge-on frame still reads as a sliver.
const MIN_FACE_SCALE: f32 = 0.02;

#[derive(Resource)]
struct BallMeshes {
    unit_circle: Handle<Mesh>,
    outline: Handle<ColorMaterial>,
}

fn setup_ball_meshes(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    cfg: Res<GameConfig>,
) {
    let outline = parse_hex_color(&cfg.balls.outline_color).unwrap_or(Color::WHITE);
    commands.insert_resource(BallMeshes {
        unit_circle: meshes.add(Circle::new(1.0)),
        outline: materials.add(outline),
    });
}

#[allow(clippy::type_complexity)]
fn attach_ball_visuals(
    mut commands: Commands,
    assets: Res<BallMeshes>,
    asset_server: Res<AssetServer>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    cfg: Res<GameConfig>,
    added: Query<(Entity, &Skill, &BallRadius, &BallColor), Added<SkillBall>>,
) {
    let label_color = parse_hex_color(&cfg.balls.label_color).unwrap_or(Color::WHITE);
    for (entity, skill, radius, color) in &added {
        let r = radius.0;
        let ring = r + cfg.balls.outline_width.max(0.0);
        let fill = materials.add(color.0);
        let icon_path = cfg.skills.get(skill.index).and_then(|s| s.icon.clone());
        commands.entity(entity).with_children(|p| {
            p.spawn((
                BallOutlineVisual,
                Mesh2d(assets.unit_circle.clone()),
                MeshMaterial2d(assets.outline.clone()),
                Transform::from_xyz(0.0, 0.0, 0.0).with_scale(Vec3::new(ring, ring, 1.0)),
            ));
            p.spawn((
                BallCircleVisual,
                Mesh2d(assets.unit_circle.clone()),
                MeshMaterial2d(fill),
                Transform::from_xyz(0.0, 0.0, 0.1).with_scale(Vec3::new(r, r, 1.0)),
            ));
            p.spawn((BallFace, Transform::from_xyz(0.0, 0.0, 0.2), Visibility::default()))
                .with_children(|face| {
                    if let Some(path) = &icon_path {
                        face.spawn((
                            FaceIcon,
                            Sprite {
                                image: asset_server.load(path.clone()),
                                custom_size: Some(Vec2::splat(r * 1.2)),
                                ..default()
                            },
                            Transform::default(),
                            Visibility::Hidden,
                        ));
                    }
                    face.spawn((
                        FaceLabel,
                        Text2d::new(skill.label.clone()),
                        TextFont {
                            font_size: cfg.balls.label_font_size,
                            ..default()
                        },
                        TextColor(label_color),
                        Transform::from_xyz(0.0, 0.0, 0.1),
                        Visibility::Visible,
                    ));
                });
        });
    }
}

/// Horizontal face scale for a flip angle: `|cos|`, kept off zero.
pub fn face_scale(flip_angle: f32) -> f32 {
    flip_angle.cos().abs().max(MIN_FACE_SCALE)
}

/// Label side once the flip passes the edge-on point, or whenever the icon is
/// not usable.
pub fn shows_label(flip_angle: f32, icon_ready: bool) -> bool {
    flip_angle > FRAC_PI_2 || !icon_ready
}

#[allow(clippy::type_complexity)]
fn sync_ball_faces(
    asset_server: Res<AssetServer>,
    balls: Query<(&BallInteraction, &Children), With<SkillBall>>,
    mut faces: Query<(&mut Transform, &Children), With<BallFace>>,
    mut icons: Query<(&Sprite, &mut Visibility), (With<FaceIcon>, Without<FaceLabel>)>,
    mut labels: Query<&mut Visibility, (With<FaceLabel>, Without<FaceIcon>)>,
) {
    for (state, children) in &balls {
        for child in children.iter() {
            let Ok((mut tf, face_children)) = faces.get_mut(child) else {
                continue;
            };
            tf.scale.x = face_scale(state.flip_angle);
            let icon_ready = face_children.iter().any(|c| {
                icons
                    .get(c)
                    .is_ok_and(|(s, _)| matches!(asset_server.get_load_state(&s.image), Some(LoadState::Loaded)))
            });
            let label = shows_label(state.flip_angle, icon_ready);
            for c in face_children.iter() {
                if let Ok((_, mut vis)) = icons.get_mut(c) {
                    vis.set_if_neq(if label { Visibility::Hidden } else { Visibility::Inherited });
                }
                if let Ok(mut vis) = labels.get_mut(c) {
                    vis.set_if_neq(if label { Visibility::Inherited } else { Visibility::Hidden });
                }
            }
        }
    }
}

/// Warns once per icon that failed to load; the label stands in for it.
fn report_missing_icons(
    asset_server: Res<AssetServer>,
    icons: Query<(Entity, &Sprite), With<FaceIcon>>,
    mut reported: Local<Vec<Entity>>,
) {
    for (entity, sprite) in &icons {
        if reported.contains(&entity) {
            continue;
        }
        if let Some(LoadState::Failed(err)) = asset_server.get_load_state(&sprite.image) {
            warn!(target: "skills", %err, "skill icon unavailable; drawing label instead");
            reported.push(entity);
        }
    }
}

pub struct BallVisualsPlugin;

impl Plugin for BallVisualsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_ball_meshes).add_systems(
            Update,
            (attach_ball_visuals, sync_ball_faces, report_missing_icons)
                .chain()
                .in_set(RenderSyncSet),
        );
    }
}
