//! Draw-target contract for 2D sprites
//!
//! The simulation describes each frame as a clear followed by sprite draws.
//! Surface setup belongs to the host; [`DrawList`] records a frame as
//! `#[repr(C)]` instance records ready for an instance buffer.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::assets::{Texture, TextureId};

/// Linear RGBA color, channels in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgba8(rgba: [u8; 4]) -> Self {
        Self {
            r: rgba[0] as f32 / 255.0,
            g: rgba[1] as f32 / 255.0,
            b: rgba[2] as f32 / 255.0,
            a: rgba[3] as f32 / 255.0,
        }
    }

    pub fn from_array(c: [f32; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Pixel rectangle inside a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl SourceRect {
    /// The whole texture
    pub fn full(texture: &Texture) -> Self {
        Self {
            x: 0,
            y: 0,
            width: texture.width(),
            height: texture.height(),
        }
    }
}

/// One sprite draw call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteDraw {
    pub texture: TextureId,
    /// Bottom-left corner in world units
    pub position: Vec2,
    /// Rotation/scale pivot relative to `position`
    pub origin: Vec2,
    pub size: Vec2,
    pub scale: Vec2,
    /// Degrees, counterclockwise
    pub rotation: f32,
    pub source: SourceRect,
    pub flip_x: bool,
    pub flip_y: bool,
}

impl SpriteDraw {
    /// Unrotated, unscaled draw of the whole texture, pivot at the center
    pub fn new(texture: &Texture, position: Vec2, size: Vec2) -> Self {
        Self {
            texture: texture.id(),
            position,
            origin: size / 2.0,
            size,
            scale: Vec2::ONE,
            rotation: 0.0,
            source: SourceRect::full(texture),
            flip_x: false,
            flip_y: false,
        }
    }

    pub fn rotated(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }
}

/// Something that accepts a frame of sprite draws
pub trait DrawTarget {
    /// Fill the whole surface with one color
    fn clear(&mut self, color: Color);
    fn draw(&mut self, sprite: &SpriteDraw);
}

/// GPU instance record for one sprite
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    pub position: [f32; 2],
    pub origin: [f32; 2],
    pub size: [f32; 2],
    pub scale: [f32; 2],
    /// Normalized source rect (u0, v0, u1, v1), flips applied
    pub uv: [f32; 4],
    pub rotation: f32,
    pub texture: u32,
    pub _pad: [u32; 2],
}

impl SpriteInstance {
    /// Convert a draw call, normalizing the source rect by the texture size
    pub fn from_draw(sprite: &SpriteDraw, texture_size: (u32, u32)) -> Self {
        let (tw, th) = (texture_size.0.max(1) as f32, texture_size.1.max(1) as f32);
        let s = sprite.source;
        let mut u0 = s.x as f32 / tw;
        let mut v0 = s.y as f32 / th;
        let mut u1 = (s.x + s.width) as f32 / tw;
        let mut v1 = (s.y + s.height) as f32 / th;
        if sprite.flip_x {
            std::mem::swap(&mut u0, &mut u1);
        }
        if sprite.flip_y {
            std::mem::swap(&mut v0, &mut v1);
        }
        Self {
            position: sprite.position.to_array(),
            origin: sprite.origin.to_array(),
            size: sprite.size.to_array(),
            scale: sprite.scale.to_array(),
            uv: [u0, v0, u1, v1],
            rotation: sprite.rotation,
            texture: sprite.texture.0,
            _pad: [0; 2],
        }
    }
}

/// Records a frame's draws in submission order
#[derive(Debug, Default)]
pub struct DrawList {
    clear: Option<Color>,
    draws: Vec<SpriteDraw>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Color of the last clear, if any
    pub fn clear_color(&self) -> Option<Color> {
        self.clear
    }

    pub fn draws(&self) -> &[SpriteDraw] {
        &self.draws
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    /// Instance records for upload. `texture_size` maps a texture id to
    /// its pixel size for UV normalization.
    pub fn instances(&self, texture_size: impl Fn(TextureId) -> (u32, u32)) -> Vec<SpriteInstance> {
        self.draws
            .iter()
            .map(|d| SpriteInstance::from_draw(d, texture_size(d.texture)))
            .collect()
    }

    /// Raw bytes of the instance records
    pub fn instance_bytes(&self, texture_size: impl Fn(TextureId) -> (u32, u32)) -> Vec<u8> {
        bytemuck::cast_slice(&self.instances(texture_size)).to_vec()
    }
}

impl DrawTarget for DrawList {
    fn clear(&mut self, color: Color) {
        // A clear wipes everything drawn before it
        self.clear = Some(color);
        self.draws.clear();
    }

    fn draw(&mut self, sprite: &SpriteDraw) {
        self.draws.push(*sprite);
    }
}
