//! The player's boat

use glam::Vec2;

use super::object::{Bounds, GameObject, Health, ObjectContext};
use super::level::ScreenHost;
use super::projectile::Projectile;
use crate::assets::{AssetLoader, Texture};
use crate::consts::MIN_VELOCITY_SQ;
use crate::error::{AssetError, ConfigError, LevelError};
use crate::facing_degrees;
use crate::render::{DrawTarget, SpriteDraw};
use crate::settings::PlayerSettings;

/// Input-driven boat that fires cannonballs at the pointer
#[derive(Debug)]
pub struct Player {
    bounds: Bounds,
    health: Health,
    /// Facing in degrees, 0 = up
    rotation: f32,
    /// Seconds since the last shot
    time_fired: f32,
    speed: f32,
    fire_cooldown: f32,
    land_damping: f32,
    texture: Option<Texture>,
}

impl Player {
    pub fn new(settings: &PlayerSettings, texture: Texture) -> Result<Self, ConfigError> {
        Ok(Self {
            bounds: Bounds::new(
                Vec2::from_array(settings.start),
                Vec2::new(settings.width, settings.height),
            ),
            health: Health::new(settings.max_health)?,
            rotation: 0.0,
            time_fired: 0.0,
            speed: settings.speed,
            fire_cooldown: settings.fire_cooldown,
            land_damping: settings.land_damping,
            texture: Some(texture),
        })
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn position(&self) -> Vec2 {
        self.bounds.pos
    }

    pub fn set_position(&mut self, pos: Vec2) {
        self.bounds.pos = pos;
    }

    pub fn center(&self) -> Vec2 {
        self.bounds.center()
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn time_fired(&self) -> f32 {
        self.time_fired
    }

    pub fn set_time_fired(&mut self, seconds: f32) {
        self.time_fired = seconds;
    }

    pub fn health(&self) -> &Health {
        &self.health
    }

    /// Set health, telling the host when the boat sinks. The host hears about
    /// each drop to zero once, however often health is set while sunk.
    pub fn set_health(&mut self, health: i32, host: &mut dyn ScreenHost) {
        if self.health.set(health) {
            log::info!("Player health depleted, game over");
            host.show_game_over();
        }
    }

    /// Max health must stay even for the heart display
    pub fn set_max_health(&mut self, max: i32) -> Result<(), ConfigError> {
        self.health.set_max(max)
    }

    /// Velocity for this frame: each held direction adds `speed * dt` on its
    /// axis, so diagonals are faster than straight lines
    pub fn frame_velocity(&self, ctx: &ObjectContext<'_>) -> Vec2 {
        ctx.input().direction() * self.speed * ctx.dt()
    }

    pub fn update(&mut self, ctx: &mut ObjectContext<'_>) -> Result<(), LevelError> {
        let vel = self.frame_velocity(ctx);

        if vel != Vec2::ZERO {
            self.rotation = facing_degrees(vel);
        }

        self.bounds.pos = self.avoid_land(vel, |p| ctx.is_on_land(p.x, p.y));
        self.bounds.clamp_to_viewport(ctx.camera());

        if ctx.input().fire_pressed && self.time_fired > self.fire_cooldown {
            self.fire(ctx)?;
        }
        self.time_fired += ctx.dt();
        Ok(())
    }

    /// Next position for `vel`, slowing down while the boat's center would
    /// end up on land. Stops once the center is on water or the velocity has
    /// shrunk to nothing.
    pub fn avoid_land(&self, mut vel: Vec2, on_land: impl Fn(Vec2) -> bool) -> Vec2 {
        let half = self.bounds.size / 2.0;
        let mut next = self.bounds.pos + vel;
        while vel != Vec2::ZERO && on_land(next + half) {
            vel *= self.land_damping;
            // Repeated scaling stalls at the smallest subnormal instead of 0
            if vel.length_squared() < MIN_VELOCITY_SQ {
                vel = Vec2::ZERO;
            }
            next = self.bounds.pos + vel;
        }
        next
    }

    /// Shoot at the pointer. Each shot costs one health.
    fn fire(&mut self, ctx: &mut ObjectContext<'_>) -> Result<(), LevelError> {
        self.set_health(self.health.current() - 1, ctx.host());

        let target = ctx.input().pointer_world();
        let settings = &ctx.settings().projectile;
        let texture = ctx.load_texture(&settings.texture)?;
        let ball = Projectile::new(self.center(), target, settings, texture);
        log::debug!(
            "Fired from {:?} toward {:?}, health {}",
            self.center(),
            target,
            self.health.current()
        );
        ctx.add_object(GameObject::Projectile(ball));
        self.time_fired = 0.0;
        Ok(())
    }

    pub fn render(&self, target: &mut dyn DrawTarget) {
        if let Some(texture) = &self.texture {
            target.draw(
                &SpriteDraw::new(texture, self.bounds.pos, self.bounds.size).rotated(self.rotation),
            );
        }
    }

    pub fn release(&mut self, assets: &mut dyn AssetLoader) {
        if let Some(texture) = self.texture.take() {
            assets.release(texture);
        }
    }

    pub fn reacquire(&mut self, assets: &mut dyn AssetLoader, name: &str) -> Result<(), AssetError> {
        if self.texture.is_none() {
            self.texture = Some(assets.load(name)?);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssets;
    use crate::sim::level::RecordingHost;
    use crate::settings::Settings;
    use proptest::prelude::*;

    fn player(assets: &mut MemoryAssets) -> Player {
        assets.insert("boat.png", crate::assets::Pixmap::filled(9, 11, [0; 4]));
        let texture = assets.load("boat.png").unwrap();
        Player::new(&Settings::new().player, texture).unwrap()
    }

    #[test]
    fn test_new_player_defaults() {
        let mut assets = MemoryAssets::new();
        let p = player(&mut assets);
        assert_eq!(p.health().current(), 6);
        assert_eq!(p.health().max(), 6);
        assert_eq!(p.bounds().size, Vec2::new(45.0, 55.0));
        assert_eq!(p.time_fired(), 0.0);
    }

    #[test]
    fn test_odd_max_health_is_config_error() {
        let mut assets = MemoryAssets::new();
        let mut p = player(&mut assets);
        assert!(matches!(p.set_max_health(5), Err(ConfigError::OddMaxHealth(5))));
        assert!(p.set_max_health(8).is_ok());
        assert_eq!(p.health().max(), 8);
    }

    #[test]
    fn test_game_over_once_per_crossing() {
        let mut assets = MemoryAssets::new();
        let mut p = player(&mut assets);
        let mut host = RecordingHost::default();

        p.set_health(0, &mut host);
        p.set_health(0, &mut host);
        assert_eq!(host.game_overs, 1);

        p.set_health(2, &mut host);
        p.set_health(-1, &mut host);
        assert_eq!(host.game_overs, 2);
    }

    #[test]
    fn test_avoid_land_open_water() {
        let mut assets = MemoryAssets::new();
        let p = player(&mut assets);
        let next = p.avoid_land(Vec2::new(5.0, 0.0), |_| false);
        assert_eq!(next, Vec2::new(5.0, 0.0));
    }

    #[test]
    fn test_avoid_land_stops_short_of_coast() {
        let mut assets = MemoryAssets::new();
        let mut p = player(&mut assets);
        p.set_position(Vec2::new(100.0, 100.0));
        // Land starts 3 units right of the boat center
        let coast = p.center().x + 3.0;
        let next = p.avoid_land(Vec2::new(10.0, 0.0), |c| c.x >= coast);
        assert!(next.x + 22.5 < coast);
        assert!(next.x > 100.0);
    }

    #[test]
    fn test_avoid_land_everywhere_terminates() {
        let mut assets = MemoryAssets::new();
        let mut p = player(&mut assets);
        p.set_position(Vec2::new(40.0, 40.0));
        let next = p.avoid_land(Vec2::new(300.0, -300.0), |_| true);
        assert_eq!(next, Vec2::new(40.0, 40.0));
    }

    proptest! {
        #[test]
        fn prop_avoid_land_terminates_off_land(
            start_x in 0.0f32..500.0,
            start_y in 0.0f32..500.0,
            vx in -50.0f32..50.0,
            vy in -50.0f32..50.0,
            coast_offset in 0.01f32..100.0,
        ) {
            let mut assets = MemoryAssets::new();
            let mut p = player(&mut assets);
            p.set_position(Vec2::new(start_x, start_y));
            // Boat starts on water, land lies somewhere to its right
            let coast = p.center().x + coast_offset;
            let on_land = |c: Vec2| c.x >= coast;

            let next = p.avoid_land(Vec2::new(vx, vy), on_land);
            prop_assert!(!on_land(next + p.bounds().size / 2.0));
        }

        #[test]
        fn prop_avoid_land_always_land_stays_put(
            vx in -1.0e6f32..1.0e6,
            vy in -1.0e6f32..1.0e6,
        ) {
            let mut assets = MemoryAssets::new();
            let p = player(&mut assets);
            prop_assert_eq!(p.avoid_land(Vec2::new(vx, vy), |_| true), p.position());
        }
    }
}
