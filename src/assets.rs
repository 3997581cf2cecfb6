//! Texture loading
//!
//! The simulation never talks to a GPU. It asks an [`AssetLoader`] to resolve
//! image names into [`Texture`] handles, and hands those handles back through
//! [`AssetLoader::release`] when the owning object is disposed. `Texture` is
//! move-only, so a handle can be released at most once.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::AssetError;
use crate::render::Color;

/// Opaque identifier of a loaded texture, used by draw calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

/// Owning handle to a loaded texture
#[derive(Debug, PartialEq, Eq)]
pub struct Texture {
    id: TextureId,
    width: u32,
    height: u32,
}

impl Texture {
    pub fn id(&self) -> TextureId {
        self.id
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }
}

/// CPU-side RGBA8 pixel data, row 0 at the top
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pixmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Pixmap {
    /// Wrap raw RGBA8 bytes. Returns None if the length doesn't match.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() != (width as usize) * (height as usize) * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    /// Single-color pixmap
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take((width as usize) * (height as usize) * 4)
            .collect();
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Color at integer pixel coordinates, None outside the image
    pub fn pixel(&self, x: i64, y: i64) -> Option<Color> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let p = &self.data[i..i + 4];
        Some(Color::from_rgba8([p[0], p[1], p[2], p[3]]))
    }

    /// Overwrite one pixel (ignored outside the image)
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        self.data[i..i + 4].copy_from_slice(&rgba);
    }
}

/// Resolves named images into textures
pub trait AssetLoader {
    /// Load (or re-reference) the named image. Each call returns a fresh
    /// handle that must be released exactly once.
    fn load(&mut self, name: &str) -> Result<Texture, AssetError>;

    /// Pixel data behind a live texture
    fn pixels(&self, texture: &Texture) -> Option<&Pixmap>;

    /// Give a handle back to the loader
    fn release(&mut self, texture: Texture);

    /// Number of handles currently outstanding
    fn live_handles(&self) -> usize;
}

/// Shared bookkeeping for loaders that keep decoded images in memory
#[derive(Debug, Default)]
struct HandleTable {
    next_id: u32,
    /// Live handle id -> image name
    live: HashMap<TextureId, String>,
}

impl HandleTable {
    fn issue(&mut self, name: &str, image: &Pixmap) -> Texture {
        let id = TextureId(self.next_id);
        self.next_id += 1;
        self.live.insert(id, name.to_string());
        Texture {
            id,
            width: image.width(),
            height: image.height(),
        }
    }

    fn name_of(&self, texture: &Texture) -> Option<&str> {
        self.live.get(&texture.id).map(String::as_str)
    }

    fn release(&mut self, texture: Texture) {
        if self.live.remove(&texture.id).is_none() {
            log::warn!("Released unknown texture {:?}", texture.id);
        }
    }
}

/// In-memory image registry
#[derive(Debug, Default)]
pub struct MemoryAssets {
    images: HashMap<String, Pixmap>,
    handles: HandleTable,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an image under a name (replaces any previous one)
    pub fn insert(&mut self, name: impl Into<String>, image: Pixmap) {
        self.images.insert(name.into(), image);
    }

    /// Builder form of [`MemoryAssets::insert`]
    pub fn with(mut self, name: impl Into<String>, image: Pixmap) -> Self {
        self.insert(name, image);
        self
    }

    /// Register a solid-color placeholder for every name
    pub fn with_placeholders<'a>(
        mut self,
        names: impl IntoIterator<Item = &'a str>,
        width: u32,
        height: u32,
    ) -> Self {
        for name in names {
            self.insert(name, Pixmap::filled(width, height, [255, 255, 255, 255]));
        }
        self
    }
}

impl AssetLoader for MemoryAssets {
    fn load(&mut self, name: &str) -> Result<Texture, AssetError> {
        let image = self
            .images
            .get(name)
            .ok_or_else(|| AssetError::NotFound(name.to_string()))?;
        Ok(self.handles.issue(name, image))
    }

    fn pixels(&self, texture: &Texture) -> Option<&Pixmap> {
        self.handles
            .name_of(texture)
            .and_then(|name| self.images.get(name))
    }

    fn release(&mut self, texture: Texture) {
        self.handles.release(texture);
    }

    fn live_handles(&self) -> usize {
        self.handles.live.len()
    }
}

/// Loads images from a directory, decoding each file once
#[derive(Debug)]
pub struct ImageAssets {
    root: PathBuf,
    cache: HashMap<String, Pixmap>,
    handles: HandleTable,
}

impl ImageAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: HashMap::new(),
            handles: HandleTable::default(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn decode(&self, name: &str) -> Result<Pixmap, AssetError> {
        let path = self.root.join(name);
        let bytes = std::fs::read(&path).map_err(|source| AssetError::Io {
            name: name.to_string(),
            source,
        })?;
        let img = image::load_from_memory(&bytes).map_err(|e| AssetError::Decode {
            name: name.to_string(),
            message: e.to_string(),
        })?;
        let rgba = img.to_rgba8();
        let (width, height) = (rgba.width(), rgba.height());
        log::debug!("Decoded {name} ({width}x{height})");
        Pixmap::from_rgba8(width, height, rgba.into_raw()).ok_or_else(|| AssetError::Decode {
            name: name.to_string(),
            message: "pixel buffer size mismatch".to_string(),
        })
    }
}

impl AssetLoader for ImageAssets {
    fn load(&mut self, name: &str) -> Result<Texture, AssetError> {
        if !self.cache.contains_key(name) {
            let image = self.decode(name)?;
            self.cache.insert(name.to_string(), image);
        }
        let image = &self.cache[name];
        Ok(self.handles.issue(name, image))
    }

    fn pixels(&self, texture: &Texture) -> Option<&Pixmap> {
        self.handles
            .name_of(texture)
            .and_then(|name| self.cache.get(name))
    }

    fn release(&mut self, texture: Texture) {
        self.handles.release(texture);
    }

    fn live_handles(&self) -> usize {
        self.handles.live.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixmap_bounds() {
        let mut pixmap = Pixmap::filled(4, 2, [0, 0, 255, 255]);
        pixmap.set_pixel(3, 1, [255, 0, 0, 255]);
        assert_eq!(pixmap.pixel(3, 1), Some(Color::from_rgba8([255, 0, 0, 255])));
        assert_eq!(pixmap.pixel(0, 0), Some(Color::from_rgba8([0, 0, 255, 255])));
        assert_eq!(pixmap.pixel(4, 0), None);
        assert_eq!(pixmap.pixel(-1, 0), None);
    }

    #[test]
    fn test_pixmap_length_check() {
        assert!(Pixmap::from_rgba8(2, 2, vec![0; 16]).is_some());
        assert!(Pixmap::from_rgba8(2, 2, vec![0; 15]).is_none());
    }

    #[test]
    fn test_memory_load_release() {
        let mut assets = MemoryAssets::new().with("a.png", Pixmap::filled(8, 4, [1, 2, 3, 4]));

        let a = assets.load("a.png").unwrap();
        let b = assets.load("a.png").unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!((a.width(), a.height()), (8, 4));
        assert_eq!(assets.live_handles(), 2);
        assert_eq!(assets.pixels(&a).map(Pixmap::width), Some(8));

        assets.release(a);
        assets.release(b);
        assert_eq!(assets.live_handles(), 0);
    }

    #[test]
    fn test_memory_missing() {
        let mut assets = MemoryAssets::new();
        assert!(matches!(assets.load("nope.png"), Err(AssetError::NotFound(_))));
    }

    #[test]
    fn test_image_assets_decode_png() {
        let dir = std::env::temp_dir().join(format!("cannon_boat_assets_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let mut img = image::RgbaImage::new(3, 2);
        img.put_pixel(2, 1, image::Rgba([10, 20, 30, 255]));
        img.save(dir.join("tiny.png")).unwrap();

        let mut assets = ImageAssets::new(&dir);
        let tex = assets.load("tiny.png").unwrap();
        assert_eq!((tex.width(), tex.height()), (3, 2));
        let px = assets.pixels(&tex).unwrap().pixel(2, 1).unwrap();
        assert_eq!(px, Color::from_rgba8([10, 20, 30, 255]));
        assets.release(tex);
        assert_eq!(assets.live_handles(), 0);

        assert!(matches!(assets.load("missing.png"), Err(AssetError::Io { .. })));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
