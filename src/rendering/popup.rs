use std::time::Duration;

use bevy::prelude::*;

use crate::core::config::GameConfig;
use crate::core::system::RenderSyncSet;
use crate::core::viewport::Viewport;

/// The single description popup. Opening replaces whatever was shown and
/// restarts the auto-dismiss timer.
#[derive(Resource, Debug, Clone)]
pub struct PopupPresenter {
    bound: Option<Entity>,
    text: String,
    timer: Timer,
}

impl PopupPresenter {
    pub fn new(timeout: f32) -> Self {
        Self {
            bound: None,
            text: String::new(),
            timer: Timer::from_seconds(timeout.max(0.0), TimerMode::Once),
        }
    }

    pub fn open(&mut self, body: Entity, text: impl Into<String>) {
        self.bound = Some(body);
        self.text = text.into();
        self.timer.reset();
        debug!(target: "popup", ?body, "popup opened");
    }

    /// Returns true when something was showing.
    pub fn close(&mut self) -> bool {
        let was_open = self.bound.take().is_some();
        self.text.clear();
        self.timer.reset();
        if was_open {
            debug!(target: "popup", "popup closed");
        }
        was_open
    }

    /// Advances the dismiss timer; returns true when this tick closed the popup.
    pub fn tick(&mut self, delta: Duration) -> bool {
        if self.bound.is_none() {
            return false;
        }
        self.timer.tick(delta);
        if self.timer.finished() {
            self.close();
            return true;
        }
        false
    }

    /// Applies a new timeout; an open popup keeps the time already elapsed.
    pub fn set_timeout(&mut self, timeout: f32) {
        self.timer.set_duration(Duration::from_secs_f32(timeout.max(0.0)));
    }

    pub fn bound(&self) -> Option<Entity> {
        self.bound
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_open(&self) -> bool {
        self.bound.is_some()
    }

    pub fn remaining(&self) -> Duration {
        self.timer.remaining()
    }
}

impl FromWorld for PopupPresenter {
    fn from_world(world: &mut World) -> Self {
        let timeout = world
            .get_resource::<GameConfig>()
            .map(|c| c.popup.timeout)
            .unwrap_or(5.0);
        Self::new(timeout)
    }
}

fn tick_popup(time: Res<Time>, mut popup: ResMut<PopupPresenter>, alive: Query<(), With<Transform>>) {
    if let Some(body) = popup.bound() {
        if alive.get(body).is_err() {
            popup.close();
            return;
        }
    }
    if popup.tick(time.delta()) {
        debug!(target: "popup", "popup timed out");
    }
}

/// Where the popup's top-left corner goes: the body's screen position plus
/// the canvas origin and the configured margin.
pub fn popup_anchor(body_world: Vec2, vp: &Viewport, margin: f32) -> Vec2 {
    vp.world_to_screen(body_world) + vp.canvas_origin + Vec2::splat(margin)
}

#[derive(Component)]
pub struct PopupRoot;

#[derive(Component)]
pub struct PopupText;

fn setup_popup_ui(mut commands: Commands, cfg: Res<GameConfig>) {
    commands
        .spawn((
            PopupRoot,
            Node {
                position_type: PositionType::Absolute,
                display: Display::None,
                max_width: Val::Px(cfg.popup.max_width),
                padding: UiRect::all(Val::Px(8.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(0.08, 0.08, 0.1, 0.92)),
            BorderRadius::all(Val::Px(6.0)),
            ZIndex(10),
            Name::new("Popup"),
        ))
        .with_children(|p| {
            p.spawn((
                PopupText,
                Text::new(""),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}

/// Re-projects the popup onto its body every frame.
fn sync_popup_ui(
    popup: Res<PopupPresenter>,
    vp: Res<Viewport>,
    cfg: Res<GameConfig>,
    bodies: Query<&Transform>,
    mut roots: Query<&mut Node, With<PopupRoot>>,
    mut texts: Query<&mut Text, With<PopupText>>,
) {
    let anchor = popup
        .bound()
        .and_then(|b| bodies.get(b).ok())
        .map(|tf| popup_anchor(tf.translation.truncate(), &vp, cfg.popup.margin));
    for mut node in &mut roots {
        match anchor {
            Some(at) => {
                node.display = Display::Flex;
                node.left = Val::Px(at.x);
                node.top = Val::Px(at.y);
            }
            None => node.display = Display::None,
        }
    }
    if popup.is_changed() {
        for mut text in &mut texts {
            if text.0 != popup.text() {
                text.0 = popup.text().to_owned();
            }
        }
    }
}

/// Popup state and its timer.
pub struct PopupPlugin;

impl Plugin for PopupPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PopupPresenter>()
            .add_systems(Update, tick_popup.in_set(RenderSyncSet));
    }
}

/// UI node showing the popup; needs the UI plugin.
pub struct PopupUiPlugin;

impl Plugin for PopupUiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_popup_ui)
            .add_systems(Update, sync_popup_ui.in_set(RenderSyncSet).after(tick_popup));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_replaces_and_resets_timer() {
        let mut p = PopupPresenter::new(5.0);
        let a = Entity::from_raw(1);
        let b = Entity::from_raw(2);
        p.open(a, "A");
        assert!(!p.tick(Duration::from_secs_f32(4.0)));
        p.open(b, "B");
        assert_eq!(p.bound(), Some(b));
        assert_eq!(p.text(), "B");
        // timer measured from the latest open
        assert!(!p.tick(Duration::from_secs_f32(4.0)));
        assert!(p.is_open());
        assert!(p.tick(Duration::from_secs_f32(1.01)));
        assert!(!p.is_open());
        assert_eq!(p.text(), "");
    }

    #[test]
    fn close_clears_and_idle_tick_is_noop() {
        let mut p = PopupPresenter::new(5.0);
        assert!(!p.close());
        assert!(!p.tick(Duration::from_secs(60)));
        p.open(Entity::from_raw(9), "x");
        assert!(p.close());
        assert_eq!(p.bound(), None);
        assert_eq!(p.remaining(), Duration::from_secs(5));
    }

    #[test]
    fn new_timeout_applies_to_open_popup() {
        let mut p = PopupPresenter::new(5.0);
        p.open(Entity::from_raw(3), "x");
        assert!(!p.tick(Duration::from_secs_f32(1.5)));
        p.set_timeout(2.0);
        assert!(!p.tick(Duration::from_secs_f32(0.4)));
        assert!(p.tick(Duration::from_secs_f32(0.2)));
    }

    #[test]
    fn anchor_offsets_by_canvas_origin_and_margin() {
        let mut vp = Viewport::new(800.0, 600.0);
        vp.canvas_origin = Vec2::new(0.0, 40.0);
        let at = popup_anchor(Vec2::ZERO, &vp, 10.0);
        assert_eq!(at, Vec2::new(410.0, 350.0));
    }

    #[test]
    fn popup_closes_when_body_disappears() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(GameConfig::default())
            .add_plugins(PopupPlugin);
        let body = app.world_mut().spawn(Transform::default()).id();
        app.world_mut().resource_mut::<PopupPresenter>().open(body, "hi");
        app.update();
        assert!(app.world().resource::<PopupPresenter>().is_open());
        app.world_mut().despawn(body);
        app.update();
        assert!(!app.world().resource::<PopupPresenter>().is_open());
    }
}
