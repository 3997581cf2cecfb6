//! Cannon Boat entry point
//!
//! Runs the main level headless: a scripted pilot supplies input, each
//! frame is recorded into a draw list, and a summary is printed at the end.
//! A windowed host drives the same `LevelManager` calls from its event loop.
//!
//! Usage: `cannon-boat [settings.json] [asset-dir]`. Without an asset
//! directory every texture is a placeholder and the map is open water with
//! one island.

use std::collections::HashMap;
use std::error::Error;
use std::path::Path;

use glam::Vec2;

use cannon_boat::Settings;
use cannon_boat::assets::{AssetLoader, ImageAssets, MemoryAssets, Pixmap};
use cannon_boat::consts::FRAME_DT;
use cannon_boat::render::{Color, DrawList};
use cannon_boat::sim::{Camera, EdgeDetector, FrameInput, LevelManager, MainLevel, ScreenHost};

const VIEWPORT: (f32, f32) = (800.0, 600.0);
const DEMO_SECONDS: f32 = 30.0;

/// Host without a menu: logs game over and ends the run
#[derive(Debug, Default)]
struct ConsoleHost {
    game_over: bool,
}

impl ScreenHost for ConsoleHost {
    fn show_game_over(&mut self) {
        log::warn!("Game over");
        self.game_over = true;
    }
}

/// Sails a slow box and takes a shot at the upper-right corner every three
/// seconds
struct Pilot {
    trigger: EdgeDetector,
    time: f32,
}

impl Pilot {
    fn new() -> Self {
        Self {
            trigger: EdgeDetector::new(),
            time: 0.0,
        }
    }

    fn input(&mut self, screen: Vec2) -> FrameInput {
        self.time += FRAME_DT;
        let leg = (self.time / 2.0) as u32 % 4;
        // Trigger held for a quarter second, reported as a single press
        let held = self.time % 3.0 < 0.25;
        FrameInput {
            up: leg == 0,
            right: leg == 1,
            down: leg == 2,
            left: leg == 3,
            fire_pressed: self.trigger.update(held),
            pointer: Vec2::new(screen.x * 0.75, screen.y * 0.25),
            screen_height: screen.y,
        }
    }
}

/// Green pixels are land
fn is_grass(color: Color) -> bool {
    color.g > 0.5 && color.g > color.b
}

fn placeholder_assets(settings: &Settings) -> MemoryAssets {
    let hazard = &settings.hazard;
    let overlay = &settings.overlay;

    let mut map = Pixmap::filled(80, 60, [20, 60, 160, 255]);
    for y in 20..40 {
        for x in 30..50 {
            map.set_pixel(x, y, [40, 180, 60, 255]);
        }
    }

    MemoryAssets::new()
        .with_placeholders(
            [
                settings.player.texture.as_str(),
                settings.projectile.texture.as_str(),
                hazard.apple_texture.as_str(),
                hazard.banana_texture.as_str(),
                hazard.melon_texture.as_str(),
                hazard.bomb_texture.as_str(),
                overlay.full_texture.as_str(),
                overlay.half_texture.as_str(),
                overlay.empty_texture.as_str(),
            ],
            32,
            32,
        )
        .with(settings.map_texture.clone(), map)
}

fn run() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let settings = match args.first() {
        Some(path) => Settings::load(Path::new(path))?,
        None => Settings::new(),
    };
    let assets: Box<dyn AssetLoader> = match args.get(1) {
        Some(dir) => Box::new(ImageAssets::new(dir)),
        None => Box::new(placeholder_assets(&settings)),
    };

    let level = MainLevel::new(&settings);
    let mut manager = LevelManager::new(Box::new(level), settings, assets)?.with_terrain(is_grass);

    let camera = Camera::new(VIEWPORT.0, VIEWPORT.1).shared();
    manager.start(camera.clone())?;

    let mut host = ConsoleHost::default();
    let mut pilot = Pilot::new();
    let mut frame = DrawList::new();
    let mut frames = 0u32;
    let mut peak_objects = 0usize;

    let sunk = |m: &LevelManager| m.player().is_some_and(|p| p.health().is_depleted());
    while (frames as f32) * FRAME_DT < DEMO_SECONDS && !host.game_over && !sunk(&manager) {
        let input = pilot.input(camera.get().viewport());
        manager.update(FRAME_DT, &input, &mut host)?;
        manager.draw(&mut frame);
        peak_objects = peak_objects.max(manager.len());
        frames += 1;
    }

    let sizes: HashMap<_, _> = frame
        .draws()
        .iter()
        .map(|d| (d.texture, (d.source.width, d.source.height)))
        .collect();
    let bytes = frame.instance_bytes(|id| sizes.get(&id).copied().unwrap_or((1, 1)));

    let health = manager.player().map(|p| p.health().current()).unwrap_or(0);
    if let Some(center) = manager.player().map(|p| p.center()) {
        log::info!(
            "Boat finished at {:?} over map color {:?}",
            center,
            manager.color_of_map(center.x, center.y)
        );
    }
    println!(
        "{} frames, health {}, peak {} objects, last frame {} sprites ({} bytes)",
        frames,
        health,
        peak_objects,
        frame.len(),
        bytes.len()
    );

    manager.stop();
    Ok(())
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    log::info!("Cannon Boat (headless) starting...");

    if let Err(e) = run() {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
