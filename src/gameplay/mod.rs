pub mod activation;
pub mod registry;

use bevy::prelude::*;

use crate::core::system::AnimationSet;
use activation::{BodyActivated, handle_body_activated};
use registry::{BodyRegistry, spawn_skill_balls};

/// Skill bodies: spawning, the registry and what a click on a body does.
pub struct SkillBodiesPlugin;

impl Plugin for SkillBodiesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BodyRegistry>()
            .add_event::<BodyActivated>()
            .add_systems(Startup, spawn_skill_balls)
            // activation kicks off effects, so it leads the animation stage
            .add_systems(Update, handle_body_activated.in_set(AnimationSet));
    }
}
