//! Cannon Boat - a top-down boat arcade game
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (level manager, player, projectiles, hazards)
//! - `render`: Draw-target contract and GPU-ready sprite recording
//! - `assets`: Texture loading and pixel access
//! - `settings`: Data-driven game tuning

pub mod assets;
pub mod error;
pub mod render;
pub mod settings;
pub mod sim;

pub use error::{AssetError, ConfigError, LevelError};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Frame timestep used by the headless driver (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Seconds that must accumulate between two shots
    pub const FIRE_COOLDOWN: f32 = 2.0;
    /// Velocity scale applied per land-avoidance step
    pub const LAND_DAMPING: f32 = 0.9;
    /// Below this squared speed the damped velocity is treated as zero
    pub const MIN_VELOCITY_SQ: f32 = 1.0e-8;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 45.0;
    pub const PLAYER_HEIGHT: f32 = 55.0;
    pub const PLAYER_SPEED: f32 = 300.0;
    pub const PLAYER_MAX_HEALTH: i32 = 6;

    /// Cannonball defaults
    pub const CANNONBALL_SPEED: f32 = 300.0;
    pub const CANNONBALL_SIZE: f32 = 12.0;

    /// Hazard defaults
    pub const HAZARD_SPEED: f32 = 200.0;
    /// Hazard width is viewport width divided by this, times the size multiplier
    pub const HAZARD_SCALE_DIVISOR: f32 = 135.0;

    /// Shortest accepted hazard spawn interval, seconds
    pub const MIN_SPAWN_INTERVAL: f32 = 0.05;
    /// Hazards spawned in one frame at most; a longer backlog is dropped
    pub const MAX_SPAWNS_PER_TICK: u32 = 8;

    /// Background clear color (dark blue)
    pub const CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.2, 1.0];
}

/// Angle (radians) of the vector pointing from `from` to `to`
#[inline]
pub fn heading(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Unit vector for an angle in radians
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Facing in degrees for a velocity, 0 = up (+Y), counterclockwise positive
#[inline]
pub fn facing_degrees(vel: Vec2) -> f32 {
    (-vel.x.atan2(vel.y)).to_degrees()
}
