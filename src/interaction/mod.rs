pub mod drag;
pub mod gesture;
pub mod hover;
pub mod pointer;

use bevy::prelude::*;

use crate::core::system::{BeforeStepSet, InputSet};
use drag::ActiveDrag;
use gesture::GestureClassifier;
use hover::HoverState;
use pointer::PointerInputPlugin;

pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(PointerInputPlugin)
            .init_resource::<GestureClassifier>()
            .init_resource::<ActiveDrag>()
            .init_resource::<HoverState>()
            .add_systems(
                Update,
                (
                    gesture::classify_pointer_events,
                    hover::update_hover,
                    drag::apply_drag_force,
                )
                    .chain()
                    .in_set(InputSet),
            )
            .add_systems(
                PostUpdate,
                drag::release_hold_outside_play_area.in_set(BeforeStepSet),
            );
    }
}
