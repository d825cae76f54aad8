use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    #[default]
    NotStarted,
    Running,
    GameOver,
}

impl GamePhase {
    pub fn is_running(&self) -> bool {
        *self == GamePhase::Running
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GamePhase::NotStarted => "not started",
            GamePhase::Running => "running",
            GamePhase::GameOver => "game over",
        };
        f.write_str(name)
    }
}
