pub mod system_order;

pub use system_order::{AfterStepSet, AnimationSet, BeforeStepSet, InputSet, RenderSyncSet};
