//! Heart-based health bar overlay
//!
//! Each heart stands for two health points, which is why max health must be
//! even.

use glam::Vec2;

use super::object::{Bounds, Health};
use crate::assets::{AssetLoader, Texture};
use crate::error::AssetError;
use crate::render::{DrawTarget, SpriteDraw};
use crate::settings::OverlaySettings;

/// Fill state of one heart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heart {
    Full,
    Half,
    Empty,
}

impl Heart {
    /// Hearts for a health value, left to right
    pub fn row(health: &Health) -> Vec<Heart> {
        let current = health.current();
        (0..health.max() / 2)
            .map(|i| {
                if current >= 2 * (i + 1) {
                    Heart::Full
                } else if current == 2 * i + 1 {
                    Heart::Half
                } else {
                    Heart::Empty
                }
            })
            .collect()
    }
}

#[derive(Debug)]
struct HeartTextures {
    full: Texture,
    half: Texture,
    empty: Texture,
}

impl HeartTextures {
    fn load(assets: &mut dyn AssetLoader, settings: &OverlaySettings) -> Result<Self, AssetError> {
        let full = assets.load(&settings.full_texture)?;
        let half = match assets.load(&settings.half_texture) {
            Ok(t) => t,
            Err(e) => {
                assets.release(full);
                return Err(e);
            }
        };
        let empty = match assets.load(&settings.empty_texture) {
            Ok(t) => t,
            Err(e) => {
                assets.release(full);
                assets.release(half);
                return Err(e);
            }
        };
        Ok(Self { full, half, empty })
    }
}

/// Draws the player's health as a row of hearts
#[derive(Debug)]
pub struct HealthIndicator {
    position: Vec2,
    heart_size: f32,
    spacing: f32,
    textures: Option<HeartTextures>,
}

impl HealthIndicator {
    pub fn new(assets: &mut dyn AssetLoader, settings: &OverlaySettings) -> Result<Self, AssetError> {
        Ok(Self {
            position: Vec2::from_array(settings.position),
            heart_size: settings.heart_size,
            spacing: settings.spacing,
            textures: Some(HeartTextures::load(assets, settings)?),
        })
    }

    /// Bounds of the first heart
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.position, Vec2::splat(self.heart_size))
    }

    pub fn render(&self, target: &mut dyn DrawTarget, health: &Health) {
        let Some(textures) = &self.textures else {
            return;
        };
        let size = Vec2::splat(self.heart_size);
        for (i, heart) in Heart::row(health).into_iter().enumerate() {
            let texture = match heart {
                Heart::Full => &textures.full,
                Heart::Half => &textures.half,
                Heart::Empty => &textures.empty,
            };
            let x = self.position.x + i as f32 * (self.heart_size + self.spacing);
            target.draw(&SpriteDraw::new(texture, Vec2::new(x, self.position.y), size));
        }
    }

    pub fn release(&mut self, assets: &mut dyn AssetLoader) {
        if let Some(textures) = self.textures.take() {
            assets.release(textures.full);
            assets.release(textures.half);
            assets.release(textures.empty);
        }
    }

    pub fn reacquire(
        &mut self,
        assets: &mut dyn AssetLoader,
        settings: &OverlaySettings,
    ) -> Result<(), AssetError> {
        if self.textures.is_none() {
            self.textures = Some(HeartTextures::load(assets, settings)?);
        }
        Ok(())
    }
}
