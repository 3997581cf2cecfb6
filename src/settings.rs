//! Game tuning and preferences
//!
//! Loaded from a JSON file when one is given, otherwise the defaults are used.
//! Every field falls back to its default, so partial files are fine.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Player boat tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Sprite width in world units
    pub width: f32,
    /// Sprite height in world units
    pub height: f32,
    /// Speed contributed by each held direction (units per second)
    pub speed: f32,
    /// Max health, must be even
    pub max_health: i32,
    /// Seconds that must accumulate between shots
    pub fire_cooldown: f32,
    /// Velocity scale per land-avoidance step (0 < damping < 1)
    pub land_damping: f32,
    /// Starting position (bottom-left corner)
    pub start: [f32; 2],
    pub texture: String,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            speed: PLAYER_SPEED,
            max_health: PLAYER_MAX_HEALTH,
            fire_cooldown: FIRE_COOLDOWN,
            land_damping: LAND_DAMPING,
            start: [0.0, 0.0],
            texture: "DuckBoat_TopView.png".to_string(),
        }
    }
}

/// Cannonball tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileSettings {
    pub speed: f32,
    pub size: f32,
    pub texture: String,
}

impl Default for ProjectileSettings {
    fn default() -> Self {
        Self {
            speed: CANNONBALL_SPEED,
            size: CANNONBALL_SIZE,
            texture: "cannonball.png".to_string(),
        }
    }
}

/// Fruit/bomb tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardSettings {
    pub speed: f32,
    /// Hazard width = viewport width / scale_divisor * size multiplier
    pub scale_divisor: f32,
    /// Fixed point every hazard heads toward
    pub launch_point: [f32; 2],
    /// Health lost when a fruit reaches the player
    pub fruit_damage: i32,
    /// Health lost when a bomb reaches the player
    pub bomb_damage: i32,
    pub apple_texture: String,
    pub banana_texture: String,
    pub melon_texture: String,
    pub bomb_texture: String,
}

impl Default for HazardSettings {
    fn default() -> Self {
        Self {
            speed: HAZARD_SPEED,
            scale_divisor: HAZARD_SCALE_DIVISOR,
            launch_point: [0.0, 0.0],
            fruit_damage: 1,
            bomb_damage: 2,
            apple_texture: "apple.png".to_string(),
            banana_texture: "banana.png".to_string(),
            melon_texture: "melon.png".to_string(),
            bomb_texture: "bomb.png".to_string(),
        }
    }
}

/// Hazard spawner tuning for the main level
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnSettings {
    /// Seconds between spawns (0 disables spawning, otherwise at least
    /// `MIN_SPAWN_INTERVAL`)
    pub interval: f32,
    /// RNG seed for spawn positions and variants
    pub seed: u64,
    /// Smallest size multiplier
    pub min_size: u32,
    /// Largest size multiplier (inclusive)
    pub max_size: u32,
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            interval: 1.5,
            seed: 0x5eed,
            min_size: 1,
            max_size: 3,
        }
    }
}

/// Health bar overlay layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlaySettings {
    /// Bottom-left corner of the first heart
    pub position: [f32; 2],
    pub heart_size: f32,
    /// Horizontal gap between hearts
    pub spacing: f32,
    pub full_texture: String,
    pub half_texture: String,
    pub empty_texture: String,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            position: [5.0, 5.0],
            heart_size: 24.0,
            spacing: 4.0,
            full_texture: "heart_full.png".to_string(),
            half_texture: "heart_half.png".to_string(),
            empty_texture: "heart_empty.png".to_string(),
        }
    }
}

/// Complete game settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub player: PlayerSettings,
    pub projectile: ProjectileSettings,
    pub hazard: HazardSettings,
    pub spawn: SpawnSettings,
    pub overlay: OverlaySettings,
    /// Name of the map image for the main level
    pub map_texture: String,
    /// Background clear color (RGBA)
    pub clear_color: [f32; 4],
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player: PlayerSettings::default(),
            projectile: ProjectileSettings::default(),
            hazard: HazardSettings::default(),
            spawn: SpawnSettings::default(),
            overlay: OverlaySettings::default(),
            map_texture: "map.png".to_string(),
            clear_color: CLEAR_COLOR,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check invariants that would otherwise surface mid-game
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.player.max_health % 2 != 0 {
            return Err(ConfigError::OddMaxHealth(self.player.max_health));
        }
        if self.player.max_health <= 0 {
            return Err(ConfigError::NonPositive {
                field: "player.max_health",
                value: self.player.max_health as f32,
            });
        }
        let positive = [
            ("player.width", self.player.width),
            ("player.height", self.player.height),
            ("player.speed", self.player.speed),
            ("projectile.speed", self.projectile.speed),
            ("projectile.size", self.projectile.size),
            ("hazard.speed", self.hazard.speed),
            ("hazard.scale_divisor", self.hazard.scale_divisor),
            ("overlay.heart_size", self.overlay.heart_size),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        // Damping must shrink the velocity or the land loop never converges
        if !(self.player.land_damping > 0.0 && self.player.land_damping < 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "player.land_damping",
                value: self.player.land_damping,
                min: 0.0,
                max: 1.0,
            });
        }
        let interval = self.spawn.interval;
        if interval != 0.0 && !(interval >= MIN_SPAWN_INTERVAL) {
            return Err(ConfigError::OutOfRange {
                field: "spawn.interval",
                value: interval,
                min: MIN_SPAWN_INTERVAL,
                max: f32::INFINITY,
            });
        }
        Ok(())
    }

    /// Parse and validate settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::new();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.player.max_health, 6);
        assert_eq!(settings.clear_color, [0.0, 0.0, 0.2, 1.0]);
    }

    #[test]
    fn test_odd_max_health_rejected() {
        let mut settings = Settings::new();
        settings.player.max_health = 5;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::OddMaxHealth(5))
        ));
    }

    #[test]
    fn test_damping_must_shrink() {
        let mut settings = Settings::new();
        settings.player.land_damping = 1.0;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::OutOfRange {
                field: "player.land_damping",
                ..
            })
        ));
    }

    #[test]
    fn test_spawn_interval_floor() {
        let err = Settings::from_json(r#"{ "spawn": { "interval": 1e-10 } }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                field: "spawn.interval",
                ..
            }
        ));

        let mut settings = Settings::new();
        settings.spawn.interval = -1.0;
        assert!(settings.validate().is_err());
        // Zero switches spawning off
        settings.spawn.interval = 0.0;
        assert!(settings.validate().is_ok());
        settings.spawn.interval = MIN_SPAWN_INTERVAL;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "player": { "max_health": 8 } }"#).unwrap();
        assert_eq!(settings.player.max_health, 8);
        assert_eq!(settings.player.width, PLAYER_WIDTH);
        assert_eq!(settings.hazard.speed, HAZARD_SPEED);
        assert_eq!(settings.map_texture, "map.png");
    }

    #[test]
    fn test_json_odd_health_fails() {
        let err = Settings::from_json(r#"{ "player": { "max_health": 7 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::OddMaxHealth(7)));
    }

    #[test]
    fn test_save_load() {
        let dir = std::env::temp_dir().join(format!("cannon_boat_settings_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.json");

        let mut settings = Settings::new();
        settings.spawn.seed = 42;
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded.spawn.seed, 42);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
