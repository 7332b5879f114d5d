//! Patient education handouts: the static library, day-based
//! recommendations and the auto-push rules.

pub mod auto_push;
pub mod library;
pub mod recommend;

pub use auto_push::{due_materials, AutoPushRule, PushContext, PushTrigger, AUTO_PUSH_RULES};
pub use library::{material, materials, materials_by_category, Material, MaterialCategory, MaterialKey};
pub use recommend::recommend_materials;
