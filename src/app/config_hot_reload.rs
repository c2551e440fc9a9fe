// This file is part of Skill Balls.
// Runtime config hot-reload (desktop only).

use bevy::prelude::*;
use std::{collections::HashMap, path::PathBuf, time::SystemTime};

use crate::core::config::GameConfig;
use crate::interaction::gesture::GestureClassifier;
use crate::physics::escape::EscapeSweep;
use crate::rendering::popup::PopupPresenter;

#[derive(Resource, Debug, Clone)]
pub struct ConfigReloadSettings {
    pub paths: Vec<PathBuf>,
    pub interval_secs: f32,
}
impl Default for ConfigReloadSettings {
    fn default() -> Self {
        Self {
            paths: vec![
                PathBuf::from("assets/config/game.ron"),
                PathBuf::from("assets/config/game.local.ron"),
            ],
            interval_secs: 0.5,
        }
    }
}

#[derive(Resource, Debug)]
struct ConfigReloadState {
    last_mod: HashMap<PathBuf, SystemTime>,
    timer: Timer,
}
impl Default for ConfigReloadState {
    fn default() -> Self {
        Self {
            last_mod: HashMap::new(),
            timer: Timer::from_seconds(0.5, TimerMode::Repeating),
        }
    }
}

/// Polls the config files and swaps in a fresh `GameConfig` when any changed.
/// Skill bodies already spawned keep their identity; tuning values apply live.
pub struct ConfigHotReloadPlugin;

impl Plugin for ConfigHotReloadPlugin {
    fn build(&self, app: &mut App) {
        #[cfg(not(target_arch = "wasm32"))]
        {
            app.init_resource::<ConfigReloadSettings>()
                .init_resource::<ConfigReloadState>()
                .add_systems(Update, poll_and_reload_config);
        }
        app.add_systems(Update, apply_config_tuning);
    }
}

fn poll_and_reload_config(
    time: Res<Time>,
    settings: Res<ConfigReloadSettings>,
    mut state: ResMut<ConfigReloadState>,
    mut cfg_res: ResMut<GameConfig>,
    mut windows: Query<&mut Window>,
) {
    let want = std::time::Duration::from_secs_f32(settings.interval_secs.max(0.05));
    if state.timer.duration() != want {
        state.timer.set_duration(want);
    }
    if !state.timer.tick(time.delta()).just_finished() {
        return;
    }
    let mut dirty = false;
    for path in &settings.paths {
        let Ok(modified) = std::fs::metadata(path).and_then(|m| m.modified()) else {
            continue;
        };
        let entry = state.last_mod.entry(path.clone()).or_insert(SystemTime::UNIX_EPOCH);
        if modified > *entry {
            *entry = modified;
            dirty = true;
        }
    }
    if !dirty {
        return;
    }
    let (new_cfg, _used, errors) = GameConfig::load_layered(settings.paths.iter());
    for e in errors {
        warn!("CONFIG HOT-RELOAD issue: {e}");
    }
    if *cfg_res == new_cfg {
        return;
    }
    for w in new_cfg.validate() {
        warn!("CONFIG WARNING: {w}");
    }
    info!("Config hot-reload applied");
    if let Ok(mut window) = windows.single_mut() {
        if window.title != new_cfg.window.title {
            window.title = new_cfg.window.title.clone();
        }
    }
    *cfg_res = new_cfg;
}

/// Pushes config values cached in other resources back in sync.
fn apply_config_tuning(
    cfg: Res<GameConfig>,
    mut gesture: Option<ResMut<GestureClassifier>>,
    mut sweep: Option<ResMut<EscapeSweep>>,
    mut popup: Option<ResMut<PopupPresenter>>,
) {
    if !cfg.is_changed() || cfg.is_added() {
        return;
    }
    if let Some(g) = gesture.as_deref_mut() {
        g.set_threshold(cfg.gesture.drag_threshold);
    }
    if let Some(s) = sweep.as_deref_mut() {
        s.set_duration(std::time::Duration::from_secs_f32(cfg.escape.interval.max(0.01)));
    }
    if let Some(p) = popup.as_deref_mut() {
        p.set_timeout(cfg.popup.timeout);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn swapped_config_retunes_cached_values() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(GameConfig::default())
            .init_resource::<GestureClassifier>()
            .init_resource::<EscapeSweep>()
            .init_resource::<PopupPresenter>()
            .add_systems(Update, apply_config_tuning);
        app.update();

        {
            let mut cfg = app.world_mut().resource_mut::<GameConfig>();
            cfg.gesture.drag_threshold = 30.0;
            cfg.escape.interval = 7.0;
            cfg.popup.timeout = 2.0;
        }
        app.update();

        let mut g = app.world().resource::<GestureClassifier>().clone();
        g.pointer_down(Vec2::ZERO);
        assert!(!g.pointer_move(Vec2::new(25.0, 0.0)));
        assert_eq!(app.world().resource::<EscapeSweep>().duration(), Duration::from_secs(7));
        let popup = app.world().resource::<PopupPresenter>();
        assert_eq!(popup.remaining(), Duration::from_secs(2));
    }
}
