//! Cannonballs and hazards
//!
//! Both travel in a straight line at constant speed. The heading is fixed at
//! construction and never recomputed. Both leave the level once they drift
//! out of the viewport, or when they hit something.

use glam::Vec2;

use super::camera::Camera;
use super::object::{Bounds, Disposal, Lifecycle};
use crate::assets::{AssetLoader, Texture};
use crate::render::{DrawTarget, SpriteDraw};
use crate::settings::{HazardSettings, ProjectileSettings};
use crate::{direction, heading};

/// Fixed-heading straight-line motion
#[derive(Debug, Clone, Copy, PartialEq)]
struct Ballistic {
    /// Radians
    angle: f32,
    /// Units per second
    speed: f32,
}

impl Ballistic {
    fn advance(&self, bounds: &mut Bounds, dt: f32, camera: Camera) -> Lifecycle {
        bounds.pos += direction(self.angle) * self.speed * dt;
        if bounds.leaves_viewport(camera) {
            Lifecycle::Dispose(Disposal::OutOfBounds)
        } else {
            Lifecycle::Alive
        }
    }
}

/// A cannonball fired by the player
#[derive(Debug)]
pub struct Projectile {
    bounds: Bounds,
    motion: Ballistic,
    texture: Option<Texture>,
}

impl Projectile {
    /// Centered on `origin`, heading for `target`
    pub fn new(origin: Vec2, target: Vec2, settings: &ProjectileSettings, texture: Texture) -> Self {
        let size = Vec2::splat(settings.size);
        Self {
            bounds: Bounds::new(origin - size / 2.0, size),
            motion: Ballistic {
                angle: heading(origin, target),
                speed: settings.speed,
            },
            texture: Some(texture),
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Heading in radians
    pub fn angle(&self) -> f32 {
        self.motion.angle
    }

    pub fn speed(&self) -> f32 {
        self.motion.speed
    }

    pub fn update(&mut self, dt: f32, camera: Camera) -> Lifecycle {
        self.motion.advance(&mut self.bounds, dt, camera)
    }

    /// Hit something
    pub fn explode(&mut self) -> Disposal {
        Disposal::Exploded
    }

    pub fn render(&self, target: &mut dyn DrawTarget) {
        if let Some(texture) = &self.texture {
            target.draw(&SpriteDraw::new(texture, self.bounds.pos, self.bounds.size));
        }
    }

    pub fn release(&mut self, assets: &mut dyn AssetLoader) {
        if let Some(texture) = self.texture.take() {
            assets.release(texture);
        }
    }
}

/// Hazard variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardKind {
    Apple,
    Banana,
    Melon,
    /// The damaging one
    Bomb,
}

impl HazardKind {
    pub const ALL: [HazardKind; 4] = [
        HazardKind::Apple,
        HazardKind::Banana,
        HazardKind::Melon,
        HazardKind::Bomb,
    ];

    /// Pick a variant by index, anything out of range is an apple
    pub fn from_selector(select: i32) -> Self {
        match select {
            1 => HazardKind::Banana,
            2 => HazardKind::Melon,
            3 => HazardKind::Bomb,
            _ => HazardKind::Apple,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            HazardKind::Apple => "apple",
            HazardKind::Banana => "banana",
            HazardKind::Melon => "melon",
            HazardKind::Bomb => "bomb",
        }
    }

    pub fn texture<'a>(&self, settings: &'a HazardSettings) -> &'a str {
        match self {
            HazardKind::Apple => &settings.apple_texture,
            HazardKind::Banana => &settings.banana_texture,
            HazardKind::Melon => &settings.melon_texture,
            HazardKind::Bomb => &settings.bomb_texture,
        }
    }

    /// Health the player loses on contact
    pub fn damage(&self, settings: &HazardSettings) -> i32 {
        match self {
            HazardKind::Bomb => settings.bomb_damage,
            _ => settings.fruit_damage,
        }
    }
}

/// Fruit or bomb drifting toward the fixed launch point
#[derive(Debug)]
pub struct Hazard {
    bounds: Bounds,
    motion: Ballistic,
    kind: HazardKind,
    damage: i32,
    texture: Option<Texture>,
}

impl Hazard {
    /// Spawn at `spawn` (bottom-left corner). Width scales with the viewport
    /// and `size`; height follows the texture's aspect ratio.
    pub fn new(
        spawn: Vec2,
        size: u32,
        kind: HazardKind,
        settings: &HazardSettings,
        camera: Camera,
        texture: Texture,
    ) -> Self {
        let width = camera.viewport_width / settings.scale_divisor * size as f32;
        let aspect = texture.height() as f32 / texture.width().max(1) as f32;
        let launch = Vec2::from_array(settings.launch_point);
        Self {
            bounds: Bounds::new(spawn, Vec2::new(width, width * aspect)),
            motion: Ballistic {
                angle: heading(spawn, launch),
                speed: settings.speed,
            },
            kind,
            damage: kind.damage(settings),
            texture: Some(texture),
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn kind(&self) -> HazardKind {
        self.kind
    }

    pub fn angle(&self) -> f32 {
        self.motion.angle
    }

    pub fn damage(&self) -> i32 {
        self.damage
    }

    pub fn update(&mut self, dt: f32, camera: Camera) -> Lifecycle {
        self.motion.advance(&mut self.bounds, dt, camera)
    }

    /// Hit by a cannonball or the player. Disposes like leaving the screen;
    /// kept separate so an explosion effect can hook in here.
    pub fn explode(&mut self) -> Disposal {
        log::debug!("{} exploded at {:?}", self.kind.name(), self.bounds.center());
        Disposal::Exploded
    }

    pub fn render(&self, target: &mut dyn DrawTarget) {
        if let Some(texture) = &self.texture {
            target.draw(&SpriteDraw::new(texture, self.bounds.pos, self.bounds.size));
        }
    }

    pub fn release(&mut self, assets: &mut dyn AssetLoader) {
        if let Some(texture) = self.texture.take() {
            assets.release(texture);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{MemoryAssets, Pixmap};
    use crate::settings::Settings;
    use proptest::prelude::*;

    fn assets() -> MemoryAssets {
        MemoryAssets::new()
            .with("ball.png", Pixmap::filled(8, 8, [0; 4]))
            .with("fruit.png", Pixmap::filled(20, 10, [0; 4]))
    }

    fn ball(assets: &mut MemoryAssets, origin: Vec2, target: Vec2) -> Projectile {
        let texture = assets.load("ball.png").unwrap();
        Projectile::new(origin, target, &Settings::new().projectile, texture)
    }

    #[test]
    fn test_projectile_heads_along_x() {
        let mut assets = assets();
        let camera = Camera::new(800.0, 600.0);
        let mut p = ball(&mut assets, Vec2::new(100.0, 100.0), Vec2::new(200.0, 100.0));
        assert!(p.angle().abs() < 1e-6);

        let before = p.bounds().pos;
        let dt = 0.1;
        assert_eq!(p.update(dt, camera), Lifecycle::Alive);
        let after = p.bounds().pos;
        assert!((after.x - before.x - p.speed() * dt).abs() < 1e-3);
        assert!((after.y - before.y).abs() < 1e-4);
    }

    #[test]
    fn test_projectile_centered_on_origin() {
        let mut assets = assets();
        let p = ball(&mut assets, Vec2::new(50.0, 60.0), Vec2::new(0.0, 0.0));
        assert_eq!(p.bounds().center(), Vec2::new(50.0, 60.0));
    }

    #[test]
    fn test_projectile_disposes_off_screen() {
        let mut assets = assets();
        let camera = Camera::new(800.0, 600.0);
        let mut p = ball(&mut assets, Vec2::new(20.0, 300.0), Vec2::new(0.0, 300.0));
        let mut frames = 0;
        while p.update(1.0 / 60.0, camera) == Lifecycle::Alive {
            frames += 1;
            assert!(frames < 1000);
        }
        assert!(p.bounds().pos.x <= -p.bounds().size.x / 2.0);
    }

    #[test]
    fn test_hazard_selector() {
        assert_eq!(HazardKind::from_selector(0), HazardKind::Apple);
        assert_eq!(HazardKind::from_selector(2), HazardKind::Melon);
        assert_eq!(HazardKind::from_selector(3), HazardKind::Bomb);
        assert_eq!(HazardKind::from_selector(42), HazardKind::Apple);
    }

    #[test]
    fn test_bomb_hits_harder() {
        let settings = Settings::new().hazard;
        assert!(HazardKind::Bomb.damage(&settings) > HazardKind::Apple.damage(&settings));
    }

    #[test]
    fn test_hazard_size_and_heading() {
        let mut assets = assets();
        let settings = Settings::new().hazard;
        let camera = Camera::new(1350.0, 600.0);
        let texture = assets.load("fruit.png").unwrap();
        let h = Hazard::new(Vec2::new(300.0, 400.0), 2, HazardKind::Melon, &settings, camera, texture);

        // 1350 / 135 * 2 = 20 wide, texture is 2:1
        assert_eq!(h.bounds().size, Vec2::new(20.0, 10.0));
        // Heads for the launch point at the origin
        let expected = (-400.0f32).atan2(-300.0);
        assert!((h.angle() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_release_once() {
        let mut assets = assets();
        let mut p = ball(&mut assets, Vec2::ZERO, Vec2::ONE);
        assert_eq!(assets.live_handles(), 1);
        p.release(&mut assets);
        p.release(&mut assets);
        assert_eq!(assets.live_handles(), 0);
    }

    proptest! {
        #[test]
        fn prop_heading_never_changes(
            ox in 100.0f32..700.0,
            oy in 100.0f32..500.0,
            tx in -1000.0f32..1000.0,
            ty in -1000.0f32..1000.0,
            frames in 1usize..30,
        ) {
            let mut assets = assets();
            let camera = Camera::new(800.0, 600.0);
            let mut p = ball(&mut assets, Vec2::new(ox, oy), Vec2::new(tx, ty));
            let angle = p.angle();
            let start = p.bounds().pos;
            for _ in 0..frames {
                p.update(1.0 / 60.0, camera);
            }
            prop_assert_eq!(p.angle(), angle);
            // Displacement stays on the heading line
            let moved = p.bounds().pos - start;
            let expected = direction(angle) * p.speed() * (frames as f32 / 60.0);
            prop_assert!((moved - expected).length() < 1e-2);
        }
    }
}
