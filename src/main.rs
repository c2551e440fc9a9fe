use bevy::prelude::*;
#[cfg(not(target_arch = "wasm32"))]
use bevy::window::WindowResolution;

use skill_balls::{GameConfig, GamePlugin, Viewport};

/// Outcome of config loading, logged once the log plugin is up.
#[derive(Resource, Debug, Default)]
struct ConfigLoadReport {
    used: Vec<String>,
    errors: Vec<String>,
    warnings: Vec<String>,
}

#[cfg(any(target_arch = "wasm32", feature = "embedded_config"))]
fn load_config() -> (GameConfig, Vec<String>, Vec<String>) {
    // No local override layer when embedded.
    const RAW: &str = include_str!("../assets/config/game.ron");
    match GameConfig::from_ron_str(RAW) {
        Ok(cfg) => (cfg, vec!["<embedded game.ron>".into()], Vec::new()),
        Err(e) => (GameConfig::default(), Vec::new(), vec![format!("embedded config: {e}; using defaults")]),
    }
}

#[cfg(not(any(target_arch = "wasm32", feature = "embedded_config")))]
fn load_config() -> (GameConfig, Vec<String>, Vec<String>) {
    GameConfig::load_layered(["assets/config/game.ron", "assets/config/game.local.ron"])
}

fn log_config_report(report: Res<ConfigLoadReport>, cfg: Res<GameConfig>) {
    for e in &report.errors {
        warn!("CONFIG LOAD ISSUE: {e}");
    }
    if report.used.is_empty() {
        info!("No config layers found; using defaults");
    } else {
        info!(used = ?report.used, "Config layers loaded");
    }
    for w in &report.warnings {
        warn!("CONFIG WARNING: {w}");
    }
    info!(?cfg.window, skills = cfg.skills.len(), "Window config");
}

fn main() {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
    }

    let (cfg, used, errors) = load_config();
    let warnings = cfg.validate();

    let primary_window = {
        #[cfg(target_arch = "wasm32")]
        {
            Window {
                title: cfg.window.title.clone(),
                canvas: Some("#skillsCanvas".into()),
                fit_canvas_to_parent: true,
                prevent_default_event_handling: true,
                ..default()
            }
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            Window {
                title: cfg.window.title.clone(),
                resolution: WindowResolution::new(cfg.window.width, cfg.window.height),
                resizable: true,
                ..default()
            }
        }
    };

    App::new()
        .insert_resource(Viewport::new(cfg.window.width, cfg.window.height))
        .insert_resource(ConfigLoadReport { used, errors, warnings })
        .insert_resource(cfg)
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(primary_window),
            ..default()
        }))
        .add_plugins(GamePlugin)
        .add_systems(PreStartup, log_config_report)
        .run();
}
