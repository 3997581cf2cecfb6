//! Frame-driven simulation module
//!
//! All gameplay logic lives here. One thread drives `update` then `draw`
//! each frame; objects never hold references to the manager. Instead each
//! update receives an [`ObjectContext`] scoped to that call.
//!
//! Iteration order: objects update in insertion order. Objects spawned during
//! a frame are appended after the traversal and first update next frame.
//! Objects removed during a frame are skipped if not yet visited, then
//! compacted (and their textures released) before `update` returns.

pub mod camera;
pub mod collision;
pub mod indicator;
pub mod input;
pub mod level;
pub mod main_level;
pub mod object;
pub mod player;
pub mod projectile;
pub mod terrain;

pub use camera::{Camera, SharedCamera};
pub use collision::{Hit, find_hits};
pub use indicator::{Heart, HealthIndicator};
pub use input::{EdgeDetector, FrameInput};
pub use level::{Level, LevelManager, LevelSetup, RecordingHost, ScreenHost};
pub use main_level::MainLevel;
pub use object::{Bounds, Disposal, GameObject, Health, Lifecycle, ObjectContext, ObjectId};
pub use player::Player;
pub use projectile::{Hazard, HazardKind, Projectile};
pub use terrain::{MapSprite, NeverLand, TerrainClassifier, TerrainQuery};
