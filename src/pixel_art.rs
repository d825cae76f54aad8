//! 8-bit sprites and the drawing surface they are blitted onto

/// Player ship, 5x3 art pixels
pub const PLAYER_ART: [[u8; 5]; 3] = [
    [0, 1, 1, 1, 0],
    [1, 1, 1, 1, 1],
    [1, 0, 1, 0, 1],
];

/// Invader, 5x3 art pixels
pub const ENEMY_ART: [[u8; 5]; 3] = [
    [0, 1, 0, 1, 0],
    [1, 1, 1, 1, 1],
    [0, 1, 1, 1, 0],
];

/// What is being drawn. Hosts pick the actual colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shade {
    Player,
    Laser,
    Enemy,
    Text,
}

/// A 2D target in field units, origin top-left, y growing downwards
pub trait DrawSurface {
    /// Paint the whole surface with the background
    fn clear(&mut self);
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, shade: Shade);
    /// `(x, y)` is the text baseline start
    fn fill_text(&mut self, x: f32, y: f32, text: &str, shade: Shade);
}

/// Emits one `scale`-sized square for every set pixel of `art`, row by row
pub fn draw_pixel_art<S, const W: usize>(
    surface: &mut S,
    art: &[[u8; W]],
    start_x: f32,
    start_y: f32,
    scale: f32,
    shade: Shade,
) where
    S: DrawSurface + ?Sized,
{
    for (row_idx, row) in art.iter().enumerate() {
        for (col_idx, &pixel) in row.iter().enumerate() {
            if pixel != 0 {
                surface.fill_rect(
                    start_x + col_idx as f32 * scale,
                    start_y + row_idx as f32 * scale,
                    scale,
                    scale,
                    shade,
                );
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        shade: Shade,
    },
    Text {
        x: f32,
        y: f32,
        text: String,
        shade: Shade,
    },
}

/// Records draw calls so the last committed frame can be replayed by a host
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }
}

impl DrawSurface for DrawList {
    fn clear(&mut self) {
        self.commands.clear();
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, shade: Shade) {
        self.commands.push(DrawCommand::FillRect {
            x,
            y,
            width,
            height,
            shade,
        });
    }

    fn fill_text(&mut self, x: f32, y: f32, text: &str, shade: Shade) {
        self.commands.push(DrawCommand::Text {
            x,
            y,
            text: text.to_string(),
            shade,
        });
    }
}
