use super::Bounds;

/// The player's ship. Only the horizontal offset ever changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Left edge
    pub x: f32,
    /// Top edge, fixed for the whole game
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Player {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn move_left(&mut self, step: f32) {
        self.x = (self.x - step).max(0.0);
    }

    pub fn move_right(&mut self, step: f32, max_x: f32) {
        self.x = (self.x + step).min(max_x);
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }
}
