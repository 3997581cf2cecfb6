//! Game object family and the context objects update against

use glam::Vec2;

use super::camera::Camera;
use super::indicator::HealthIndicator;
use super::input::FrameInput;
use super::level::ScreenHost;
use super::player::Player;
use super::projectile::{Hazard, Projectile};
use super::terrain::TerrainQuery;
use crate::assets::{AssetLoader, Texture};
use crate::error::{AssetError, ConfigError, LevelError};
use crate::render::DrawTarget;
use crate::settings::Settings;

/// Handle of an object registered with a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u32);

/// Axis-aligned box, `pos` is the bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Bounds {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    /// Interiors intersect (touching edges don't count)
    pub fn overlaps(&self, other: &Bounds) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.pos.x < b_max.x && other.pos.x < a_max.x && self.pos.y < b_max.y && other.pos.y < a_max.y
    }

    /// True once the box crosses the band `[-half size, viewport - half size]`
    /// on either axis. Anything this far out is at least half off screen.
    pub fn leaves_viewport(&self, camera: Camera) -> bool {
        let half = self.size / 2.0;
        self.pos.x <= -half.x
            || self.pos.x >= camera.viewport_width - half.x
            || self.pos.y <= -half.y
            || self.pos.y >= camera.viewport_height - half.y
    }

    /// Clamp into the same band, keeping at least half the box visible
    pub fn clamp_to_viewport(&mut self, camera: Camera) {
        let half = self.size / 2.0;
        let max = camera.viewport() - half;
        // max() before min() so a viewport smaller than the box can't panic
        self.pos = self.pos.max(-half).min(max.max(-half));
    }
}

/// Health capability, `0 <= current <= max`, max always even
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    current: i32,
    max: i32,
}

impl Health {
    /// Full health. Fails on an odd or non-positive max.
    pub fn new(max: i32) -> Result<Self, ConfigError> {
        Self::check_max(max)?;
        Ok(Self { current: max, max })
    }

    fn check_max(max: i32) -> Result<(), ConfigError> {
        if max % 2 != 0 {
            return Err(ConfigError::OddMaxHealth(max));
        }
        if max <= 0 {
            return Err(ConfigError::NonPositive {
                field: "max_health",
                value: max as f32,
            });
        }
        Ok(())
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0
    }

    /// Set health (clamped). Returns true when this call crossed from alive
    /// to depleted.
    pub fn set(&mut self, value: i32) -> bool {
        let was_alive = !self.is_depleted();
        self.current = value.clamp(0, self.max);
        was_alive && self.is_depleted()
    }

    /// Change the max, clamping current health down if needed
    pub fn set_max(&mut self, max: i32) -> Result<(), ConfigError> {
        Self::check_max(max)?;
        self.max = max;
        self.current = self.current.min(max);
        Ok(())
    }
}

/// Why an object left the level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposal {
    /// Drifted out of the viewport
    OutOfBounds,
    /// Hit something
    Exploded,
    /// Removed by another object or the host
    Removed,
    /// Replaced by a new player
    Replaced,
}

/// Result of one object update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Alive,
    Dispose(Disposal),
}

/// Everything a level holds
#[derive(Debug)]
pub enum GameObject {
    Player(Player),
    Projectile(Projectile),
    Hazard(Hazard),
    HealthIndicator(HealthIndicator),
}

impl GameObject {
    pub fn bounds(&self) -> Bounds {
        match self {
            GameObject::Player(p) => p.bounds(),
            GameObject::Projectile(p) => p.bounds(),
            GameObject::Hazard(h) => h.bounds(),
            GameObject::HealthIndicator(h) => h.bounds(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GameObject::Player(_) => "player",
            GameObject::Projectile(_) => "cannonball",
            GameObject::Hazard(h) => h.kind().name(),
            GameObject::HealthIndicator(_) => "health indicator",
        }
    }

    pub fn as_player(&self) -> Option<&Player> {
        match self {
            GameObject::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut Player> {
        match self {
            GameObject::Player(p) => Some(p),
            _ => None,
        }
    }

    /// Objects kept across a stop/start cycle (their textures are reloaded)
    pub fn survives_restart(&self) -> bool {
        matches!(self, GameObject::Player(_) | GameObject::HealthIndicator(_))
    }

    pub fn update(&mut self, ctx: &mut ObjectContext<'_>) -> Result<Lifecycle, LevelError> {
        match self {
            GameObject::Player(p) => {
                p.update(ctx)?;
                Ok(Lifecycle::Alive)
            }
            GameObject::Projectile(p) => Ok(p.update(ctx.dt(), ctx.camera())),
            GameObject::Hazard(h) => Ok(h.update(ctx.dt(), ctx.camera())),
            GameObject::HealthIndicator(_) => Ok(Lifecycle::Alive),
        }
    }

    /// Draw the object. `player_health` feeds overlays.
    pub fn render(&self, target: &mut dyn DrawTarget, player_health: Option<&Health>) {
        match self {
            GameObject::Player(p) => p.render(target),
            GameObject::Projectile(p) => p.render(target),
            GameObject::Hazard(h) => h.render(target),
            GameObject::HealthIndicator(h) => {
                if let Some(health) = player_health {
                    h.render(target, health);
                }
            }
        }
    }

    /// Return textures to the loader. Safe to call more than once.
    pub fn release(&mut self, assets: &mut dyn AssetLoader) {
        match self {
            GameObject::Player(p) => p.release(assets),
            GameObject::Projectile(p) => p.release(assets),
            GameObject::Hazard(h) => h.release(assets),
            GameObject::HealthIndicator(h) => h.release(assets),
        }
    }

    /// Reload textures dropped by [`GameObject::release`] for objects that
    /// survive a restart
    pub fn reacquire(
        &mut self,
        assets: &mut dyn AssetLoader,
        settings: &Settings,
    ) -> Result<(), AssetError> {
        match self {
            GameObject::Player(p) => p.reacquire(assets, &settings.player.texture),
            GameObject::HealthIndicator(h) => h.reacquire(assets, &settings.overlay),
            // Transient objects are dropped on stop
            GameObject::Projectile(_) | GameObject::Hazard(_) => Ok(()),
        }
    }
}

/// Capabilities handed to an object for the duration of its update
///
/// Stands in for a back-reference to the level: objects can query terrain,
/// spawn and remove objects, load textures and signal the host, but can't
/// hold on to any of it past the call.
pub struct ObjectContext<'a> {
    pub(crate) dt: f32,
    pub(crate) camera: Camera,
    pub(crate) input: &'a FrameInput,
    pub(crate) settings: &'a Settings,
    pub(crate) terrain: TerrainQuery<'a>,
    pub(crate) assets: &'a mut dyn AssetLoader,
    pub(crate) spawned: &'a mut Vec<GameObject>,
    pub(crate) removals: &'a mut Vec<ObjectId>,
    pub(crate) host: &'a mut dyn ScreenHost,
}

impl<'a> ObjectContext<'a> {
    /// Seconds since the last frame
    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn camera(&self) -> Camera {
        self.camera
    }

    pub fn input(&self) -> &'a FrameInput {
        self.input
    }

    pub fn settings(&self) -> &'a Settings {
        self.settings
    }

    pub fn is_on_land(&self, x: f32, y: f32) -> bool {
        self.terrain.is_on_land(x, y)
    }

    /// Queue an object; it joins the level after the current traversal
    pub fn add_object(&mut self, object: GameObject) {
        log::debug!("Spawned {}", object.name());
        self.spawned.push(object);
    }

    /// Remove an object by id. Unknown ids are ignored.
    pub fn remove_object(&mut self, id: ObjectId) {
        if !self.removals.contains(&id) {
            self.removals.push(id);
        }
    }

    pub fn load_texture(&mut self, name: &str) -> Result<Texture, AssetError> {
        self.assets.load(name)
    }

    pub fn host(&mut self) -> &mut dyn ScreenHost {
        &mut *self.host
    }
}
