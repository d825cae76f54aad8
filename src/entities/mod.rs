mod bounds;
mod enemy;
mod game_phase;
mod laser;
mod player;

// Re-export all public types
pub use bounds::Bounds;
pub use enemy::{Enemy, EnemyId};
pub use game_phase::GamePhase;
pub use laser::{Laser, LaserId};
pub use player::Player;
