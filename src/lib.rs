pub mod animation;
pub mod app;
pub mod core;
pub mod debug;
pub mod gameplay;
pub mod interaction;
pub mod physics;
pub mod rendering;

// Curated re-exports
pub use app::game::{GamePlugin, SkillBoardLogicPlugin};
pub use core::components::{BallInteraction, BallRadius, Skill, SkillBall};
pub use core::config::{GameConfig, WindowConfig};
pub use core::viewport::{PlayArea, Viewport};
pub use gameplay::registry::BodyRegistry;
