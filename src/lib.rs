// Library exports for the terminal host and for testing
pub use config::{Field, GameConfig};
pub use entities::{Bounds, Enemy, EnemyId, GamePhase, Laser, LaserId, Player};
pub use game::{FrameOutcome, Game, GameHooks};
pub use input::{GameKey, InputAction, KeyOutcome};
pub use pixel_art::{DrawCommand, DrawList, DrawSurface, Shade};

pub mod config;
pub mod entities;
pub mod game;
pub mod input;
pub mod pixel_art;
pub mod renderer;
pub mod sim;
pub mod spawner;
pub mod timers;
