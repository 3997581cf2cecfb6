//! Viewport shared between the host and the level

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;

/// Visible world rectangle, origin bottom-left
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl Camera {
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            viewport_width,
            viewport_height,
        }
    }

    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.viewport_width, self.viewport_height)
    }

    /// Wrap for sharing with a level. The host keeps its own clone and
    /// updates it on resize; the level only reads.
    pub fn shared(self) -> SharedCamera {
        Rc::new(Cell::new(self))
    }
}

/// Host-owned camera handle read by the level each frame
pub type SharedCamera = Rc<Cell<Camera>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_visible_through_clone() {
        let host = Camera::new(800.0, 600.0).shared();
        let level = Rc::clone(&host);
        host.set(Camera::new(1024.0, 768.0));
        assert_eq!(level.get().viewport(), Vec2::new(1024.0, 768.0));
    }
}
