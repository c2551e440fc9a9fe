use std::collections::HashMap;

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use rand::Rng;

use crate::core::components::{BallColor, BallInteraction, BallRadius, Skill, SkillBall};
use crate::core::config::GameConfig;
use crate::core::viewport::{PlayArea, Viewport};

/// Registration-ordered index of the skill bodies.
///
/// Entities are generational handles, so a stale entry can never alias a newer
/// body; lookups through a query simply miss.
#[derive(Resource, Debug, Default)]
pub struct BodyRegistry {
    order: Vec<Entity>,
    by_label: HashMap<String, Entity>,
}

impl BodyRegistry {
    /// Returns false (and keeps the first body) when `label` is already taken.
    pub fn register(&mut self, label: &str, entity: Entity) -> bool {
        if self.by_label.contains_key(label) {
            return false;
        }
        self.by_label.insert(label.to_owned(), entity);
        self.order.push(entity);
        true
    }

    pub fn get(&self, label: &str) -> Option<Entity> {
        self.by_label.get(label).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// First registered body whose disc contains `point`. `probe` yields the
    /// center and radius of an eligible body, or `None` to skip it.
    pub fn hit_test<F>(&self, point: Vec2, mut probe: F) -> Option<Entity>
    where
        F: FnMut(Entity) -> Option<(Vec2, f32)>,
    {
        self.order.iter().copied().find(|&e| {
            probe(e).is_some_and(|(center, radius)| center.distance_squared(point) <= radius * radius)
        })
    }

    /// Freezes a body on its first activation. Returns true only for that first
    /// call; later calls change nothing.
    pub fn mark_splattered(
        &self,
        commands: &mut Commands,
        entity: Entity,
        state: &mut BallInteraction,
        velocity: Option<&mut Velocity>,
    ) -> bool {
        if !state.mark_splattered() {
            return false;
        }
        if let Some(v) = velocity {
            *v = Velocity::zero();
        }
        commands.entity(entity).insert(RigidBody::Fixed);
        true
    }
}

/// Rejection-samples `count` centers inside `area` at least `2 * radius` apart.
/// When the budget runs out the last candidate is taken as is.
pub fn plan_spawn_positions<R: Rng + ?Sized>(
    rng: &mut R,
    area: Rect,
    radius: f32,
    count: usize,
    attempts: u32,
) -> Vec<Vec2> {
    let sample = |rng: &mut R| {
        let x = if area.max.x > area.min.x {
            rng.gen_range(area.min.x..=area.max.x)
        } else {
            area.min.x
        };
        let y = if area.max.y > area.min.y {
            rng.gen_range(area.min.y..=area.max.y)
        } else {
            area.min.y
        };
        Vec2::new(x, y)
    };
    let min_d2 = (2.0 * radius) * (2.0 * radius);
    let mut placed: Vec<Vec2> = Vec::with_capacity(count);
    for i in 0..count {
        let mut candidate = sample(rng);
        let mut ok = placed.iter().all(|p| p.distance_squared(candidate) >= min_d2);
        let mut tries = 1;
        while !ok && tries < attempts.max(1) {
            candidate = sample(rng);
            ok = placed.iter().all(|p| p.distance_squared(candidate) >= min_d2);
            tries += 1;
        }
        if !ok {
            warn!(target: "skills", index = i, attempts, "no free spawn spot; accepting overlap");
        }
        placed.push(candidate);
    }
    placed
}

/// One dynamic disc per configured skill, in config order.
pub fn spawn_skill_balls(
    mut commands: Commands,
    cfg: Res<GameConfig>,
    vp: Res<Viewport>,
    mut registry: ResMut<BodyRegistry>,
) {
    let radius = cfg.balls.radius.max(1.0);
    let area = PlayArea::from_viewport(&vp, &cfg.play_area);
    let mut rng = rand::thread_rng();
    let spots = plan_spawn_positions(
        &mut rng,
        area.spawn_rect(radius),
        radius,
        cfg.skills.len(),
        cfg.balls.spawn_attempts,
    );
    for (index, (skill, screen)) in cfg.skills.iter().zip(spots).enumerate() {
        if registry.get(&skill.name).is_some() {
            warn!(target: "skills", label = %skill.name, "duplicate skill label skipped");
            continue;
        }
        let world = vp.screen_to_world(screen);
        let entity = commands
            .spawn((
                SkillBall,
                Skill {
                    index,
                    label: skill.name.clone(),
                },
                BallRadius(radius),
                BallColor(skill.fill_color()),
                BallInteraction::default(),
                Transform::from_xyz(world.x, world.y, 0.0),
                Visibility::default(),
                RigidBody::Dynamic,
                Collider::ball(radius),
                Velocity::zero(),
                Restitution::coefficient(cfg.balls.restitution),
                Name::new(format!("Skill:{}", skill.name)),
            ))
            .id();
        registry.register(&skill.name, entity);
    }
    info!(target: "skills", count = registry.len(), radius, "skill bodies spawned");
}
