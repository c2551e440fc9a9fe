// This file is part of Skill Balls.
// Copyright (C) 2025 Adam and contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use bevy::prelude::*;
use bevy_rapier2d::prelude::PhysicsSet;

use crate::animation::AnimationPlugin;
use crate::app::auto_close::AutoClosePlugin;
use crate::app::config_hot_reload::ConfigHotReloadPlugin;
use crate::core::system::{AfterStepSet, AnimationSet, BeforeStepSet, InputSet, RenderSyncSet};
use crate::core::viewport::{Viewport, sync_viewport_from_window};
use crate::debug::DebugPlugin;
use crate::gameplay::SkillBodiesPlugin;
use crate::interaction::InteractionPlugin;
use crate::physics::ArenaPlugin;
use crate::physics::rapier::PhysicsSetupPlugin;
use crate::rendering::RenderingPlugin;
use crate::rendering::popup::PopupPlugin;
use crate::rendering::splatter_layer::SplatterLayerPlugin;

/// Stage ordering shared by every plugin. Kept separate from `GamePlugin` so
/// headless apps can reuse it without a window or renderer.
pub struct SkillBoardSchedulePlugin;

impl Plugin for SkillBoardSchedulePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Viewport>()
            .configure_sets(
                Update,
                (
                    InputSet,
                    AnimationSet.after(InputSet),
                    RenderSyncSet.after(AnimationSet),
                ),
            )
            .configure_sets(
                PostUpdate,
                (
                    BeforeStepSet.before(PhysicsSet::SyncBackend),
                    AfterStepSet.after(PhysicsSet::Writeback),
                ),
            );
    }
}

/// The interaction logic without anything that draws or simulates.
pub struct SkillBoardLogicPlugin;

impl Plugin for SkillBoardLogicPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            SkillBoardSchedulePlugin,
            SplatterLayerPlugin,
            PopupPlugin,
            SkillBodiesPlugin,
            InteractionPlugin,
            AnimationPlugin,
            ArenaPlugin,
        ));
    }
}

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            SkillBoardLogicPlugin,
            PhysicsSetupPlugin,
            RenderingPlugin,
            DebugPlugin,
            ConfigHotReloadPlugin,
            AutoClosePlugin,
        ))
        .add_systems(PreStartup, sync_viewport_from_window)
        .add_systems(PreUpdate, sync_viewport_from_window);
    }
}
