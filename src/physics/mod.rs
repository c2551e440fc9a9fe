pub mod boundary;
pub mod escape;
pub mod rapier;

use bevy::prelude::*;

use escape::EscapeSweep;

/// Walls and drift recovery; independent of the Rapier plugin itself.
pub struct ArenaPlugin;

impl Plugin for ArenaPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EscapeSweep>()
            .add_systems(Update, (boundary::rebuild_boundaries, escape::sweep_escaped_bodies));
    }
}
