//! Per-frame input snapshot
//!
//! The host polls its devices once per frame and hands the result to the
//! level, so update logic never reads global device state.

use glam::Vec2;

/// Input commands for a single frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    /// Direction keys currently held
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Primary action pressed this frame (edge, not held)
    pub fire_pressed: bool,
    /// Pointer position in screen space (origin top-left)
    pub pointer: Vec2,
    /// Screen height used to flip the pointer into world space
    pub screen_height: f32,
}

impl FrameInput {
    /// Pointer in world space (origin bottom-left)
    pub fn pointer_world(&self) -> Vec2 {
        Vec2::new(self.pointer.x, self.screen_height - self.pointer.y)
    }

    /// Held directions as a unit-per-axis vector (diagonals not normalized)
    pub fn direction(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.up {
            dir.y += 1.0;
        }
        if self.down {
            dir.y -= 1.0;
        }
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        dir
    }
}

/// Turns a held button into press edges
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeDetector {
    was_down: bool,
}

impl EdgeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current button state, returns true only on the press frame
    pub fn update(&mut self, down: bool) -> bool {
        let pressed = down && !self.was_down;
        self.was_down = down;
        pressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_flip() {
        let input = FrameInput {
            pointer: Vec2::new(30.0, 100.0),
            screen_height: 600.0,
            ..Default::default()
        };
        assert_eq!(input.pointer_world(), Vec2::new(30.0, 500.0));
    }

    #[test]
    fn test_direction_diagonal_not_normalized() {
        let input = FrameInput {
            up: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(input.direction(), Vec2::new(1.0, 1.0));

        let opposed = FrameInput {
            left: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(opposed.direction(), Vec2::ZERO);
    }

    #[test]
    fn test_edge_detector() {
        let mut edge = EdgeDetector::new();
        assert!(!edge.update(false));
        assert!(edge.update(true));
        assert!(!edge.update(true));
        assert!(!edge.update(false));
        assert!(edge.update(true));
    }
}
