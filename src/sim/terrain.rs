//! Map sprite and land/water classification
//!
//! The map image is stretched over the viewport. Classifying a world point
//! means sampling the map pixel under it and handing the color to a
//! [`TerrainClassifier`]. The default policy, [`NeverLand`], treats
//! everything as water.

use glam::Vec2;

use super::camera::Camera;
use crate::assets::{AssetLoader, Pixmap, Texture};
use crate::render::{Color, DrawTarget, SpriteDraw};

/// Decides whether a map color is land
pub trait TerrainClassifier {
    fn is_land(&self, color: Color) -> bool;
}

/// Everything is sailable
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverLand;

impl TerrainClassifier for NeverLand {
    fn is_land(&self, _color: Color) -> bool {
        false
    }
}

impl<F> TerrainClassifier for F
where
    F: Fn(Color) -> bool,
{
    fn is_land(&self, color: Color) -> bool {
        self(color)
    }
}

/// The level background, sized to cover the viewport
#[derive(Debug)]
pub struct MapSprite {
    texture: Texture,
    pixmap: Pixmap,
    position: Vec2,
    size: Vec2,
}

impl MapSprite {
    /// Place the map at the origin, stretched to the viewport
    pub fn new(texture: Texture, pixmap: Pixmap, camera: Camera) -> Self {
        Self {
            texture,
            pixmap,
            position: Vec2::ZERO,
            size: camera.viewport(),
        }
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Logical size in world units
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Map color under a world point, None outside the image
    ///
    /// Image rows run top to bottom while world Y runs bottom to top, and the
    /// sprite is stretched, so the point is flipped and rescaled to pixels.
    pub fn color_at(&self, x: f32, y: f32, viewport_height: f32) -> Option<Color> {
        let local_x = x - self.position.x;
        let local_y = viewport_height - (y - self.position.y);

        let px = local_x * (self.texture.width() as f32 / self.size.x);
        let py = local_y * (self.texture.height() as f32 / self.size.y);
        if !px.is_finite() || !py.is_finite() {
            return None;
        }
        self.pixmap.pixel(px as i64, py as i64)
    }

    pub fn render(&self, target: &mut dyn DrawTarget) {
        target.draw(&SpriteDraw::new(&self.texture, self.position, self.size));
    }

    /// Give the texture back to the loader
    pub fn release(self, assets: &mut dyn AssetLoader) {
        assets.release(self.texture);
    }
}

/// Land lookups against the current map
#[derive(Clone, Copy)]
pub struct TerrainQuery<'a> {
    map: &'a MapSprite,
    classifier: &'a dyn TerrainClassifier,
    viewport_height: f32,
}

impl<'a> TerrainQuery<'a> {
    pub fn new(map: &'a MapSprite, classifier: &'a dyn TerrainClassifier, camera: Camera) -> Self {
        Self {
            map,
            classifier,
            viewport_height: camera.viewport_height,
        }
    }

    pub fn color_at(&self, x: f32, y: f32) -> Option<Color> {
        self.map.color_at(x, y, self.viewport_height)
    }

    /// Points off the map are water
    pub fn is_on_land(&self, x: f32, y: f32) -> bool {
        self.color_at(x, y)
            .is_some_and(|color| self.classifier.is_land(color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssets;

    const GREEN: [u8; 4] = [0, 200, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 200, 255];

    /// 4x2 map: top row green, bottom row blue, stretched over 400x200
    fn map(assets: &mut MemoryAssets) -> MapSprite {
        let mut pixmap = Pixmap::filled(4, 2, BLUE);
        for x in 0..4 {
            pixmap.set_pixel(x, 0, GREEN);
        }
        assets.insert("map.png", pixmap.clone());
        let texture = assets.load("map.png").unwrap();
        MapSprite::new(texture, pixmap, Camera::new(400.0, 200.0))
    }

    fn is_green(c: Color) -> bool {
        c.g > 0.5
    }

    #[test]
    fn test_sampling_flips_y() {
        let mut assets = MemoryAssets::new();
        let map = map(&mut assets);
        // World top half maps to image row 0
        assert_eq!(map.color_at(50.0, 150.0, 200.0), Some(Color::from_rgba8(GREEN)));
        assert_eq!(map.color_at(50.0, 50.0, 200.0), Some(Color::from_rgba8(BLUE)));
    }

    #[test]
    fn test_sampling_rescales_x() {
        let mut assets = MemoryAssets::new();
        let mut map = map(&mut assets);
        map.pixmap.set_pixel(3, 1, GREEN);
        // 400 world units over 4 pixels: x=350 is pixel 3
        assert_eq!(map.color_at(350.0, 50.0, 200.0), Some(Color::from_rgba8(GREEN)));
        assert_eq!(map.color_at(250.0, 50.0, 200.0), Some(Color::from_rgba8(BLUE)));
    }

    #[test]
    fn test_outside_map_is_water() {
        let mut assets = MemoryAssets::new();
        let map = map(&mut assets);
        let classifier = |_c: Color| true;
        let query = TerrainQuery::new(&map, &classifier, Camera::new(400.0, 200.0));
        assert!(query.is_on_land(10.0, 10.0));
        assert!(!query.is_on_land(-500.0, 10.0));
        assert!(!query.is_on_land(10.0, 900.0));
    }

    #[test]
    fn test_never_land_default() {
        let mut assets = MemoryAssets::new();
        let map = map(&mut assets);
        let query = TerrainQuery::new(&map, &NeverLand, Camera::new(400.0, 200.0));
        assert!(!query.is_on_land(50.0, 150.0));

        let query = TerrainQuery::new(&map, &is_green, Camera::new(400.0, 200.0));
        assert!(query.is_on_land(50.0, 150.0));
        assert!(!query.is_on_land(50.0, 50.0));
    }

    #[test]
    fn test_release_returns_texture() {
        let mut assets = MemoryAssets::new();
        let map = map(&mut assets);
        assert_eq!(assets.live_handles(), 1);
        map.release(&mut assets);
        assert_eq!(assets.live_handles(), 0);
    }
}
