use bevy::prelude::*;

use crate::core::components::{BallInteraction, BallRadius};
use crate::core::config::GameConfig;
use crate::core::viewport::Viewport;
use crate::gameplay::activation::BodyActivated;
use crate::gameplay::registry::BodyRegistry;
use crate::interaction::drag::ActiveDrag;
use crate::interaction::pointer::{PointerEvent, PointerTracker};
use crate::rendering::popup::PopupPresenter;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GesturePhase {
    #[default]
    Idle,
    Down {
        origin: Vec2,
    },
    /// Entered once the press travels past the threshold; final for the session.
    Dragging,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Click(Vec2),
    DragRelease,
}

/// Press / move / release classifier for one pointer session.
#[derive(Resource, Debug, Clone)]
pub struct GestureClassifier {
    phase: GesturePhase,
    threshold: f32,
}

impl GestureClassifier {
    pub fn new(threshold: f32) -> Self {
        Self {
            phase: GesturePhase::Idle,
            threshold: threshold.max(0.0),
        }
    }

    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = threshold.max(0.0);
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    pub fn pointer_down(&mut self, p: Vec2) {
        self.phase = GesturePhase::Down { origin: p };
    }

    /// Returns true on the move that turns the press into a drag.
    pub fn pointer_move(&mut self, p: Vec2) -> bool {
        if let GesturePhase::Down { origin } = self.phase {
            if origin.distance(p) > self.threshold {
                self.phase = GesturePhase::Dragging;
                return true;
            }
        }
        false
    }

    pub fn pointer_up(&mut self, p: Vec2) -> Option<Gesture> {
        // the release point itself can push a press over the threshold
        self.pointer_move(p);
        let out = match self.phase {
            GesturePhase::Idle => None,
            GesturePhase::Down { .. } => Some(Gesture::Click(p)),
            GesturePhase::Dragging => Some(Gesture::DragRelease),
        };
        self.phase = GesturePhase::Idle;
        out
    }

    /// Session lost (pointer left the window); nothing fires.
    pub fn cancel(&mut self) {
        self.phase = GesturePhase::Idle;
    }
}

impl FromWorld for GestureClassifier {
    fn from_world(world: &mut World) -> Self {
        let threshold = world
            .get_resource::<GameConfig>()
            .map(|c| c.gesture.drag_threshold)
            .unwrap_or(6.0);
        Self::new(threshold)
    }
}

/// Feeds pointer events through the classifier and acts on the outcome:
/// presses grab bodies, clicks activate them or dismiss the popup.
#[allow(clippy::too_many_arguments)]
pub fn classify_pointer_events(
    mut events: EventReader<PointerEvent>,
    mut classifier: ResMut<GestureClassifier>,
    mut tracker: ResMut<PointerTracker>,
    mut drag: ResMut<ActiveDrag>,
    mut popup: ResMut<PopupPresenter>,
    mut activated: EventWriter<BodyActivated>,
    registry: Res<BodyRegistry>,
    vp: Res<Viewport>,
    cfg: Res<GameConfig>,
    bodies: Query<(&Transform, &BallRadius, &BallInteraction)>,
) {
    for ev in events.read() {
        tracker.apply(ev);
        match *ev {
            PointerEvent::Down(p) => {
                classifier.pointer_down(p);
                if !cfg.drag.enabled {
                    continue;
                }
                let world = vp.screen_to_world(p);
                let grabbed = registry.hit_test(world, |e| {
                    let (tf, r, st) = bodies.get(e).ok()?;
                    (!st.splattered).then(|| (tf.translation.truncate(), r.0))
                });
                if let Some(e) = grabbed {
                    if let Ok((tf, _, _)) = bodies.get(e) {
                        drag.grab(e, tf.translation.truncate() - world);
                    }
                }
            }
            PointerEvent::Move(p) => {
                if classifier.pointer_move(p) {
                    debug!(target: "gesture", x = p.x, y = p.y, "press became a drag");
                }
            }
            PointerEvent::Up(p) => {
                drag.release();
                match classifier.pointer_up(p) {
                    Some(Gesture::Click(at)) => {
                        let world = vp.screen_to_world(at);
                        let hit = registry.hit_test(world, |e| {
                            bodies.get(e).ok().map(|(tf, r, _)| (tf.translation.truncate(), r.0))
                        });
                        match hit {
                            Some(entity) => {
                                debug!(target: "gesture", ?entity, "click on body");
                                activated.write(BodyActivated { entity });
                            }
                            None => {
                                debug!(target: "gesture", "click on empty space");
                                popup.close();
                            }
                        }
                    }
                    Some(Gesture::DragRelease) => debug!(target: "gesture", "drag released"),
                    None => {}
                }
            }
            PointerEvent::Left => {
                classifier.cancel();
                drag.release();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_press_is_a_click_at_release_point() {
        let mut g = GestureClassifier::new(6.0);
        g.pointer_down(Vec2::new(10.0, 10.0));
        assert!(!g.pointer_move(Vec2::new(14.0, 13.0)));
        assert_eq!(
            g.pointer_up(Vec2::new(14.0, 14.0)),
            Some(Gesture::Click(Vec2::new(14.0, 14.0)))
        );
        assert_eq!(g.phase(), GesturePhase::Idle);
    }

    #[test]
    fn exactly_threshold_is_still_a_click() {
        let mut g = GestureClassifier::new(6.0);
        g.pointer_down(Vec2::ZERO);
        assert!(!g.pointer_move(Vec2::new(6.0, 0.0)));
        assert!(matches!(g.pointer_up(Vec2::new(6.0, 0.0)), Some(Gesture::Click(_))));
    }

    #[test]
    fn drag_is_permanent_even_when_returning_home() {
        let mut g = GestureClassifier::new(6.0);
        g.pointer_down(Vec2::ZERO);
        assert!(g.pointer_move(Vec2::new(7.0, 0.0)));
        assert_eq!(g.phase(), GesturePhase::Dragging);
        // only the transition reports true
        assert!(!g.pointer_move(Vec2::new(20.0, 0.0)));
        g.pointer_move(Vec2::ZERO);
        assert_eq!(g.pointer_up(Vec2::ZERO), Some(Gesture::DragRelease));
    }

    #[test]
    fn release_far_from_press_without_moves_is_not_a_click() {
        let mut g = GestureClassifier::new(6.0);
        g.pointer_down(Vec2::ZERO);
        assert_eq!(g.pointer_up(Vec2::new(0.0, 30.0)), Some(Gesture::DragRelease));
    }

    #[test]
    fn threshold_comes_from_config() {
        let mut world = World::new();
        let mut cfg = GameConfig::default();
        cfg.gesture.drag_threshold = 20.0;
        world.insert_resource(cfg);
        let mut g = GestureClassifier::from_world(&mut world);
        g.pointer_down(Vec2::ZERO);
        assert!(!g.pointer_move(Vec2::new(15.0, 0.0)));
        assert!(g.pointer_move(Vec2::new(21.0, 0.0)));
    }

    #[test]
    fn up_without_down_and_cancel_fire_nothing() {
        let mut g = GestureClassifier::new(6.0);
        assert_eq!(g.pointer_up(Vec2::ZERO), None);
        g.pointer_down(Vec2::ZERO);
        g.cancel();
        assert_eq!(g.pointer_up(Vec2::ZERO), None);
    }
}
