use std::fmt;

use super::Bounds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LaserId(pub u64);

impl fmt::Display for LaserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "laser#{}", self.0)
    }
}

/// A player shot travelling straight up
#[derive(Debug, Clone, PartialEq)]
pub struct Laser {
    pub id: LaserId,
    /// Left edge of the hitbox; lines up with the ship's left edge at fire time
    pub x: f32,
    /// Top edge
    pub y: f32,
}

impl Laser {
    pub fn new(id: LaserId, x: f32, y: f32) -> Self {
        Self { id, x, y }
    }

    pub fn update(&mut self, speed: f32) {
        self.y -= speed;
    }

    pub fn bounds(&self, width: f32, height: f32) -> Bounds {
        Bounds::new(self.x, self.y, width, height)
    }

    /// True once the trailing (bottom) edge is at or above the top of the field
    pub fn has_exited(&self, height: f32) -> bool {
        self.y + height <= 0.0
    }
}
