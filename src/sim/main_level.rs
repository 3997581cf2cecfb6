//! The main level: the harbour map plus a stream of fruit and bombs
//!
//! Hazards appear at seeded-random points in the upper-right quadrant and
//! drift toward the launch point, so two runs with the same seed see the
//! same waves.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::level::{Level, LevelSetup};
use super::object::GameObject;
use super::projectile::{Hazard, HazardKind};
use crate::consts::MAX_SPAWNS_PER_TICK;
use crate::error::LevelError;
use crate::settings::Settings;

pub struct MainLevel {
    map: String,
    rng: Pcg32,
    /// Seconds between spawns, 0 disables
    interval: f32,
    /// Seconds since the last spawn
    timer: f32,
    min_size: u32,
    max_size: u32,
    spawned: u32,
}

impl MainLevel {
    pub fn new(settings: &Settings) -> Self {
        let spawn = &settings.spawn;
        Self {
            map: settings.map_texture.clone(),
            rng: Pcg32::seed_from_u64(spawn.seed),
            interval: spawn.interval,
            timer: 0.0,
            min_size: spawn.min_size.max(1),
            max_size: spawn.max_size.max(spawn.min_size.max(1)),
            spawned: 0,
        }
    }

    /// Hazards spawned so far
    pub fn spawned(&self) -> u32 {
        self.spawned
    }

    fn spawn_hazard(&mut self, setup: &mut LevelSetup<'_>) -> Result<(), LevelError> {
        let settings = &setup.settings().hazard;
        let camera = setup.camera();

        let kind = HazardKind::from_selector(self.rng.random_range(0..4));
        let size = self.rng.random_range(self.min_size..=self.max_size);
        let spawn = Vec2::new(
            self.rng.random_range(0.5f32..0.9) * camera.viewport_width,
            self.rng.random_range(0.5f32..0.9) * camera.viewport_height,
        );

        let texture = setup.load_texture(kind.texture(settings))?;
        let hazard = Hazard::new(spawn, size, kind, settings, camera, texture);
        setup.add_object(GameObject::Hazard(hazard));
        self.spawned += 1;
        Ok(())
    }
}

impl Level for MainLevel {
    fn map_texture(&self) -> &str {
        &self.map
    }

    /// Opens with one hazard already on its way
    fn setup(&mut self, setup: &mut LevelSetup<'_>) -> Result<(), LevelError> {
        self.timer = 0.0;
        if self.interval > 0.0 {
            self.spawn_hazard(setup)?;
        }
        Ok(())
    }

    fn tick(&mut self, dt: f32, setup: &mut LevelSetup<'_>) -> Result<(), LevelError> {
        if self.interval <= 0.0 {
            return Ok(());
        }
        self.timer += dt;
        let mut spawned = 0;
        while self.timer >= self.interval {
            if spawned == MAX_SPAWNS_PER_TICK {
                log::debug!("Spawn backlog of {:.2}s dropped", self.timer);
                self.timer = 0.0;
                break;
            }
            self.timer -= self.interval;
            self.spawn_hazard(setup)?;
            spawned += 1;
        }
        Ok(())
    }
}
