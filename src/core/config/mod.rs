pub mod config;

pub use config::{
    parse_hex_color, BallsConfig, DragConfig, EscapeConfig, FlipConfig, GameConfig, GestureConfig,
    IdleConfig, PlayAreaConfig, PopupConfig, SkillEntry, SpawnRange, SplatterConfig, WindowConfig,
};
