//! Raw mouse/touch input folded into one screen-space pointer stream.

use bevy::input::InputSystem;
use bevy::prelude::*;
use bevy::window::{CursorLeft, PrimaryWindow};

/// Pointer activity in screen space (logical px, origin top-left).
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Vec2),
    Move(Vec2),
    Up(Vec2),
    /// Cursor left the window.
    Left,
}

/// Latest known pointer state, updated from `PointerEvent`s.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct PointerTracker {
    pub position: Option<Vec2>,
    pub pressed: bool,
}

impl PointerTracker {
    pub fn apply(&mut self, ev: &PointerEvent) {
        match *ev {
            PointerEvent::Down(p) => {
                self.position = Some(p);
                self.pressed = true;
            }
            PointerEvent::Move(p) => self.position = Some(p),
            PointerEvent::Up(p) => {
                self.position = Some(p);
                self.pressed = false;
            }
            PointerEvent::Left => {
                self.position = None;
                self.pressed = false;
            }
        }
    }
}

/// First touch wins over the mouse cursor, mirroring how a browser promotes
/// touches to pointer events.
fn current_pointer(window: &Window, touches: Option<&Touches>) -> Option<Vec2> {
    if let Some(t) = touches.and_then(|t| t.iter().next()) {
        return Some(t.position());
    }
    window.cursor_position()
}

pub fn collect_pointer_events(
    buttons: Option<Res<ButtonInput<MouseButton>>>,
    touches: Option<Res<Touches>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut left: EventReader<CursorLeft>,
    mut last: Local<Option<Vec2>>,
    mut out: EventWriter<PointerEvent>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let touches = touches.as_deref();
    let pos = current_pointer(window, touches);

    if let Some(p) = pos {
        if *last != Some(p) {
            out.write(PointerEvent::Move(p));
        }
    }

    let pressed_touch = touches.and_then(|t| t.iter_just_pressed().next().map(|t| t.position()));
    let released_touch = touches.and_then(|t| t.iter_just_released().next().map(|t| t.position()));
    let mouse_down = buttons.as_ref().is_some_and(|b| b.just_pressed(MouseButton::Left));
    let mouse_up = buttons.as_ref().is_some_and(|b| b.just_released(MouseButton::Left));

    if let Some(p) = pressed_touch.or(if mouse_down { pos } else { None }) {
        out.write(PointerEvent::Down(p));
    }
    if released_touch.is_some() || mouse_up {
        if let Some(p) = released_touch.or(pos).or(*last) {
            out.write(PointerEvent::Up(p));
        }
    }
    if left.read().count() > 0 {
        out.write(PointerEvent::Left);
        *last = None;
        return;
    }
    if pos.is_some() {
        *last = pos;
    }
}

pub struct PointerInputPlugin;

impl Plugin for PointerInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PointerEvent>()
            .add_event::<CursorLeft>()
            .init_resource::<PointerTracker>()
            .add_systems(PreUpdate, collect_pointer_events.after(InputSystem));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_follows_events() {
        let mut t = PointerTracker::default();
        t.apply(&PointerEvent::Move(Vec2::new(3.0, 4.0)));
        assert_eq!(t.position, Some(Vec2::new(3.0, 4.0)));
        assert!(!t.pressed);
        t.apply(&PointerEvent::Down(Vec2::new(5.0, 5.0)));
        assert!(t.pressed);
        t.apply(&PointerEvent::Left);
        assert_eq!(t.position, None);
        assert!(!t.pressed);
    }
}
