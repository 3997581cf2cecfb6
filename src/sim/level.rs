//! Level manager: owns the live objects and the map, drives update and draw

use super::camera::{Camera, SharedCamera};
use super::collision::{Hit, find_hits};
use super::indicator::HealthIndicator;
use super::input::FrameInput;
use super::object::{Disposal, GameObject, Lifecycle, ObjectContext, ObjectId};
use super::player::Player;
use super::terrain::{MapSprite, NeverLand, TerrainClassifier, TerrainQuery};
use crate::assets::{AssetLoader, Texture};
use crate::error::{AssetError, ConfigError, LevelError};
use crate::render::{Color, DrawTarget};
use crate::settings::Settings;

/// Receives screen transitions requested by the level
pub trait ScreenHost {
    /// The player's health ran out
    fn show_game_over(&mut self);
}

/// Host that just counts requests
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    pub game_overs: u32,
}

impl ScreenHost for RecordingHost {
    fn show_game_over(&mut self) {
        self.game_overs += 1;
    }
}

/// A concrete level: picks the map and lays out the opening objects
pub trait Level {
    /// Name of the map image
    fn map_texture(&self) -> &str;

    /// Called on every start, after the map is loaded
    fn setup(&mut self, setup: &mut LevelSetup<'_>) -> Result<(), LevelError>;

    /// Called once per frame after the objects have updated
    fn tick(&mut self, _dt: f32, _setup: &mut LevelSetup<'_>) -> Result<(), LevelError> {
        Ok(())
    }
}

/// What a [`Level`] can touch while setting up or ticking
pub struct LevelSetup<'a> {
    camera: Camera,
    settings: &'a Settings,
    assets: &'a mut dyn AssetLoader,
    spawned: &'a mut Vec<GameObject>,
}

impl<'a> LevelSetup<'a> {
    pub fn camera(&self) -> Camera {
        self.camera
    }

    pub fn settings(&self) -> &'a Settings {
        self.settings
    }

    pub fn load_texture(&mut self, name: &str) -> Result<Texture, AssetError> {
        self.assets.load(name)
    }

    /// Queue an object; it joins the level once the hook returns
    pub fn add_object(&mut self, object: GameObject) {
        log::debug!("Level spawned {}", object.name());
        self.spawned.push(object);
    }
}

#[derive(Debug)]
struct Entry {
    id: ObjectId,
    object: GameObject,
}

/// Owns the live objects, the map texture and the current player
pub struct LevelManager {
    level: Box<dyn Level>,
    settings: Settings,
    assets: Box<dyn AssetLoader>,
    terrain: Box<dyn TerrainClassifier>,
    camera: Option<SharedCamera>,
    map: Option<MapSprite>,
    /// Draw order is insertion order, back to front
    objects: Vec<Entry>,
    player: Option<ObjectId>,
    /// Set once the first start has registered the player and overlay
    initialized: bool,
    next_id: u32,
    /// Objects added during the current frame
    pending: Vec<GameObject>,
    /// Objects removed during the current frame
    removals: Vec<ObjectId>,
}

impl LevelManager {
    /// Validate settings and build an idle manager. Nothing is loaded until
    /// [`LevelManager::start`].
    pub fn new(
        level: Box<dyn Level>,
        settings: Settings,
        assets: Box<dyn AssetLoader>,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self {
            level,
            settings,
            assets,
            terrain: Box::new(NeverLand),
            camera: None,
            map: None,
            objects: Vec::new(),
            player: None,
            initialized: false,
            next_id: 1,
            pending: Vec::new(),
            removals: Vec::new(),
        })
    }

    /// Replace the land/water policy
    pub fn with_terrain(mut self, terrain: impl TerrainClassifier + 'static) -> Self {
        self.terrain = Box::new(terrain);
        self
    }

    pub fn set_terrain(&mut self, terrain: impl TerrainClassifier + 'static) {
        self.terrain = Box::new(terrain);
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn assets(&self) -> &dyn AssetLoader {
        self.assets.as_ref()
    }

    pub fn camera(&self) -> Option<Camera> {
        self.camera.as_ref().map(|c| c.get())
    }

    pub fn map(&self) -> Option<&MapSprite> {
        self.map.as_ref()
    }

    pub fn is_started(&self) -> bool {
        self.map.is_some()
    }

    /// Begin displaying the level
    ///
    /// The first start creates the player and the health overlay; later
    /// starts keep the existing player, or replace it if it was removed. The
    /// map is (re)loaded and stretched over the viewport, then the level lays
    /// out its objects.
    pub fn start(&mut self, camera: SharedCamera) -> Result<(), LevelError> {
        let cam = camera.get();
        self.camera = Some(camera);

        if self.initialized {
            for entry in &mut self.objects {
                entry.object.reacquire(self.assets.as_mut(), &self.settings)?;
            }
            if self.player.is_none() {
                log::info!("No player left from the previous run, creating one");
                self.spawn_player()?;
            }
        } else {
            self.spawn_player()?;
            let overlay = HealthIndicator::new(self.assets.as_mut(), &self.settings.overlay)?;
            self.add_object(GameObject::HealthIndicator(overlay));
            self.initialized = true;
        }

        if let Some(old) = self.map.take() {
            old.release(self.assets.as_mut());
        }
        let texture = self.assets.load(self.level.map_texture())?;
        let Some(pixmap) = self.assets.pixels(&texture).cloned() else {
            let name = self.level.map_texture().to_string();
            self.assets.release(texture);
            return Err(AssetError::Decode {
                name,
                message: "no pixel data".to_string(),
            }
            .into());
        };
        self.map = Some(MapSprite::new(texture, pixmap, cam));

        let mut setup = LevelSetup {
            camera: cam,
            settings: &self.settings,
            assets: self.assets.as_mut(),
            spawned: &mut self.pending,
        };
        let result = self.level.setup(&mut setup);
        self.commit_pending();
        result?;

        log::info!(
            "Level started ({}x{}), {} objects",
            cam.viewport_width,
            cam.viewport_height,
            self.objects.len()
        );
        Ok(())
    }

    fn spawn_player(&mut self) -> Result<ObjectId, LevelError> {
        let texture = self.assets.load(&self.settings.player.texture)?;
        let player = Player::new(&self.settings.player, texture)?;
        Ok(self.set_player(player))
    }

    /// Stop displaying the level
    ///
    /// Releases the map and every object's textures. Cannonballs and hazards
    /// are dropped; the player and overlay stay registered so the next start
    /// resumes with the same player.
    pub fn stop(&mut self) {
        if let Some(map) = self.map.take() {
            map.release(self.assets.as_mut());
        }
        let assets = self.assets.as_mut();
        for mut object in self.pending.drain(..) {
            object.release(assets);
        }
        self.removals.clear();
        self.objects.retain_mut(|entry| {
            entry.object.release(assets);
            entry.object.survives_restart()
        });
        log::info!("Level stopped, {} objects retained", self.objects.len());
    }

    pub fn player(&self) -> Option<&Player> {
        let id = self.player?;
        self.get(id).and_then(GameObject::as_player)
    }

    pub fn player_mut(&mut self) -> Option<&mut Player> {
        let id = self.player?;
        self.get_mut(id).and_then(GameObject::as_player_mut)
    }

    pub fn player_id(&self) -> Option<ObjectId> {
        self.player
    }

    /// Install a new player, disposing the current one first
    pub fn set_player(&mut self, player: Player) -> ObjectId {
        if let Some(old) = self.player.take() {
            self.dispose(old, Disposal::Replaced);
        }
        let id = self.push(GameObject::Player(player));
        self.player = Some(id);
        id
    }

    /// Register an object. A player goes through [`LevelManager::set_player`].
    pub fn add_object(&mut self, object: GameObject) -> ObjectId {
        match object {
            GameObject::Player(player) => self.set_player(player),
            other => self.push(other),
        }
    }

    /// Dispose and deregister an object. Unknown ids are ignored.
    pub fn remove_object(&mut self, id: ObjectId) -> bool {
        if self.player == Some(id) {
            self.player = None;
        }
        self.dispose(id, Disposal::Removed)
    }

    pub fn get(&self, id: ObjectId) -> Option<&GameObject> {
        self.objects.iter().find(|e| e.id == id).map(|e| &e.object)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut GameObject> {
        self.objects
            .iter_mut()
            .find(|e| e.id == id)
            .map(|e| &mut e.object)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.iter().any(|e| e.id == id)
    }

    /// Live objects in draw order
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &GameObject)> + Clone {
        self.objects.iter().map(|e| (e.id, &e.object))
    }

    /// Ids of the live objects, in draw order
    pub fn object_ids(&self) -> Vec<ObjectId> {
        self.objects.iter().map(|e| e.id).collect()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Map color under a world point, None off the map
    ///
    /// # Panics
    /// If the level hasn't been started.
    pub fn color_of_map(&self, x: f32, y: f32) -> Option<Color> {
        self.terrain_query().color_at(x, y)
    }

    /// Whether a world point is land under the current terrain policy
    ///
    /// # Panics
    /// If the level hasn't been started.
    pub fn is_on_land(&self, x: f32, y: f32) -> bool {
        self.terrain_query().is_on_land(x, y)
    }

    fn terrain_query(&self) -> TerrainQuery<'_> {
        let (Some(map), Some(camera)) = (&self.map, &self.camera) else {
            panic!("terrain queried before the level map was loaded");
        };
        TerrainQuery::new(map, self.terrain.as_ref(), camera.get())
    }

    /// Advance every live object by `dt` seconds
    ///
    /// Objects update in draw order. Spawns made during the frame join after
    /// the traversal; removals skip objects not yet visited and are compacted
    /// before returning, so a disposed object never updates or draws again.
    ///
    /// # Panics
    /// If the level hasn't been started.
    pub fn update(
        &mut self,
        dt: f32,
        input: &FrameInput,
        host: &mut dyn ScreenHost,
    ) -> Result<(), LevelError> {
        self.step(dt, input, host, |_, object, ctx| object.update(ctx))
    }

    /// One frame with `visit` standing in for each object's update
    fn step(
        &mut self,
        dt: f32,
        input: &FrameInput,
        host: &mut dyn ScreenHost,
        visit: impl FnMut(ObjectId, &mut GameObject, &mut ObjectContext<'_>) -> Result<Lifecycle, LevelError>,
    ) -> Result<(), LevelError> {
        let result = self.run_frame(dt, input, host, visit);
        self.compact();
        self.commit_pending();
        result
    }

    fn run_frame(
        &mut self,
        dt: f32,
        input: &FrameInput,
        host: &mut dyn ScreenHost,
        mut visit: impl FnMut(ObjectId, &mut GameObject, &mut ObjectContext<'_>) -> Result<Lifecycle, LevelError>,
    ) -> Result<(), LevelError> {
        let (Some(map), Some(camera)) = (&self.map, &self.camera) else {
            panic!("level updated before start");
        };
        let camera = camera.get();
        let terrain = TerrainQuery::new(map, self.terrain.as_ref(), camera);

        // Only objects present at frame start are visited
        let count = self.objects.len();
        for i in 0..count {
            let id = self.objects[i].id;
            if self.removals.contains(&id) {
                continue;
            }
            let mut ctx = ObjectContext {
                dt,
                camera,
                input,
                settings: &self.settings,
                terrain,
                assets: self.assets.as_mut(),
                spawned: &mut self.pending,
                removals: &mut self.removals,
                host: &mut *host,
            };
            if let Lifecycle::Dispose(reason) = visit(id, &mut self.objects[i].object, &mut ctx)? {
                log::debug!("{} disposed ({:?})", self.objects[i].object.name(), reason);
                if !self.removals.contains(&id) {
                    self.removals.push(id);
                }
            }
        }

        let mut setup = LevelSetup {
            camera,
            settings: &self.settings,
            assets: self.assets.as_mut(),
            spawned: &mut self.pending,
        };
        self.level.tick(dt, &mut setup)?;

        self.resolve_hits(host);
        Ok(())
    }

    fn resolve_hits(&mut self, host: &mut dyn ScreenHost) {
        let hits = find_hits(self.objects(), &self.removals);
        for hit in hits {
            match hit {
                Hit::Shot { projectile, hazard } => {
                    for id in [projectile, hazard] {
                        self.explode(id);
                        self.removals.push(id);
                    }
                }
                Hit::Rammed { hazard, damage } => {
                    self.explode(hazard);
                    self.removals.push(hazard);
                    if let Some(player) = self.player_mut() {
                        let health = player.health().current();
                        player.set_health(health - damage, host);
                    }
                }
            }
        }
    }

    fn explode(&mut self, id: ObjectId) {
        let reason = match self.get_mut(id) {
            Some(GameObject::Hazard(h)) => h.explode(),
            Some(GameObject::Projectile(p)) => p.explode(),
            _ => return,
        };
        log::debug!("{:?} disposed ({:?})", id, reason);
    }

    /// Clear the surface, draw the map, then every object back to front
    pub fn draw(&self, target: &mut dyn DrawTarget) {
        target.clear(Color::from_array(self.settings.clear_color));
        if let Some(map) = &self.map {
            map.render(target);
        }
        let player_health = self.player().map(|p| *p.health());
        for entry in &self.objects {
            entry.object.render(target, player_health.as_ref());
        }
    }

    fn push(&mut self, object: GameObject) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects.push(Entry { id, object });
        id
    }

    fn dispose(&mut self, id: ObjectId, reason: Disposal) -> bool {
        let Some(index) = self.objects.iter().position(|e| e.id == id) else {
            log::debug!("Ignoring removal of unknown object {:?}", id);
            return false;
        };
        let mut entry = self.objects.remove(index);
        entry.object.release(self.assets.as_mut());
        log::debug!("{} disposed ({:?})", entry.object.name(), reason);
        true
    }

    /// Drop objects removed this frame
    fn compact(&mut self) {
        if self.removals.is_empty() {
            return;
        }
        let removals = std::mem::take(&mut self.removals);
        if self.player.is_some_and(|id| removals.contains(&id)) {
            self.player = None;
        }
        let assets = self.assets.as_mut();
        self.objects.retain_mut(|entry| {
            if removals.contains(&entry.id) {
                entry.object.release(assets);
                false
            } else {
                true
            }
        });
    }

    fn commit_pending(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        for object in pending {
            self.add_object(object);
        }
    }
}

impl Drop for LevelManager {
    fn drop(&mut self) {
        if self.is_started() {
            log::warn!("Level dropped while displaying, releasing resources");
            self.stop();
        }
    }
}
