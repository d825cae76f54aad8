use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use crate::config::GameConfig;
use crate::entities::{GamePhase, Laser, LaserId, Player};

/// Keys the game itself listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameKey {
    ArrowLeft,
    ArrowRight,
    Space,
}

/// What a single key-down did
#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome {
    Moved { x: f32 },
    Fired(Laser),
    /// Fire request while the cooldown gate was closed
    FireDropped,
    /// No input subscription (game not running)
    Ignored,
}

/// Turns key-downs into ship movement and shots.
///
/// Lives only while the game is running: the game creates a fresh one on every
/// start (which is what reopens the fire gate) and drops it on game over.
#[derive(Debug)]
pub struct InputController {
    fire_gate_open: bool,
    next_laser_id: u64,
}

impl Default for InputController {
    fn default() -> Self {
        Self::new()
    }
}

impl InputController {
    pub fn new() -> Self {
        Self {
            fire_gate_open: true,
            next_laser_id: 0,
        }
    }

    pub fn fire_gate_open(&self) -> bool {
        self.fire_gate_open
    }

    pub fn reopen_fire_gate(&mut self) {
        self.fire_gate_open = true;
    }

    /// Applies one key-down. On [`KeyOutcome::Fired`] the gate is closed and the
    /// caller must schedule [`InputController::reopen_fire_gate`] after the
    /// configured cooldown.
    pub fn handle_key(&mut self, key: GameKey, player: &mut Player, config: &GameConfig) -> KeyOutcome {
        match key {
            GameKey::ArrowLeft => {
                player.move_left(config.player_step);
                KeyOutcome::Moved { x: player.x }
            }
            GameKey::ArrowRight => {
                player.move_right(config.player_step, config.max_player_x());
                KeyOutcome::Moved { x: player.x }
            }
            GameKey::Space => {
                if !self.fire_gate_open {
                    return KeyOutcome::FireDropped;
                }
                self.fire_gate_open = false;
                let id = LaserId(self.next_laser_id);
                self.next_laser_id += 1;
                KeyOutcome::Fired(Laser::new(id, player.x, player.y))
            }
        }
    }
}

/// Represents semantic host actions that can be triggered by input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Game(GameKey),
    /// Start from the title screen or restart after game over
    Start,
    Quit,
}

/// Maps a terminal key event to an action for the current phase.
/// Auto-repeat counts as another key-down; releases are ignored.
pub fn map_key_event(key_event: KeyEvent, phase: GamePhase) -> Option<InputAction> {
    if !matches!(key_event.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
        return None;
    }

    // Quit keys work in any phase
    if matches!(
        key_event.code,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
    ) || (key_event.code == KeyCode::Char('c')
        && key_event.modifiers.contains(KeyModifiers::CONTROL))
    {
        return Some(InputAction::Quit);
    }

    match phase {
        GamePhase::NotStarted => match key_event.code {
            KeyCode::Enter | KeyCode::Char('s') | KeyCode::Char('S') => Some(InputAction::Start),
            _ => None,
        },
        GamePhase::GameOver => match key_event.code {
            KeyCode::Enter | KeyCode::Char('r') | KeyCode::Char('R') => Some(InputAction::Start),
            _ => None,
        },
        GamePhase::Running => match key_event.code {
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
                Some(InputAction::Game(GameKey::ArrowLeft))
            }
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
                Some(InputAction::Game(GameKey::ArrowRight))
            }
            KeyCode::Char(' ') => Some(InputAction::Game(GameKey::Space)),
            _ => None,
        },
    }
}

/// Drains pending terminal events into actions, once per frame
#[derive(Debug, Default)]
pub struct InputManager {
    actions: Vec<InputAction>,
}

impl InputManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Polls all available events without blocking.
    /// Should be called once per frame before taking actions
    pub fn poll_events(&mut self, phase: GamePhase) -> color_eyre::Result<()> {
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key_event) = event::read()?
                && let Some(action) = map_key_event(key_event, phase)
            {
                self.actions.push(action);
            }
        }
        Ok(())
    }

    /// Returns and clears the actions gathered since the last call
    pub fn take_actions(&mut self) -> Vec<InputAction> {
        std::mem::take(&mut self.actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(200.0, 698.0, 20.0, 12.0)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_arrows_move_in_steps() {
        let config = GameConfig::default();
        let mut controller = InputController::new();
        let mut player = player();

        assert_eq!(
            controller.handle_key(GameKey::ArrowLeft, &mut player, &config),
            KeyOutcome::Moved { x: 190.0 }
        );
        controller.handle_key(GameKey::ArrowRight, &mut player, &config);
        controller.handle_key(GameKey::ArrowRight, &mut player, &config);
        assert_eq!(player.x, 210.0);
    }

    #[test]
    fn test_moves_clamp_to_field() {
        let config = GameConfig::default();
        let mut controller = InputController::new();
        let mut player = player();

        for _ in 0..50 {
            controller.handle_key(GameKey::ArrowRight, &mut player, &config);
        }
        assert_eq!(player.x, 380.0);
        for _ in 0..50 {
            controller.handle_key(GameKey::ArrowLeft, &mut player, &config);
        }
        assert_eq!(player.x, 0.0);
    }

    #[test]
    fn test_fire_closes_gate() {
        let config = GameConfig::default();
        let mut controller = InputController::new();
        let mut player = player();

        let KeyOutcome::Fired(laser) = controller.handle_key(GameKey::Space, &mut player, &config)
        else {
            panic!("first shot should fire");
        };
        assert_eq!((laser.x, laser.y), (200.0, 698.0));
        assert!(!controller.fire_gate_open());

        assert_eq!(
            controller.handle_key(GameKey::Space, &mut player, &config),
            KeyOutcome::FireDropped
        );

        controller.reopen_fire_gate();
        let KeyOutcome::Fired(second) = controller.handle_key(GameKey::Space, &mut player, &config)
        else {
            panic!("gate was reopened");
        };
        assert_ne!(laser.id, second.id);
    }

    #[test]
    fn test_key_mapping_per_phase() {
        assert_eq!(
            map_key_event(press(KeyCode::Left), GamePhase::Running),
            Some(InputAction::Game(GameKey::ArrowLeft))
        );
        assert_eq!(
            map_key_event(press(KeyCode::Char(' ')), GamePhase::Running),
            Some(InputAction::Game(GameKey::Space))
        );
        assert_eq!(map_key_event(press(KeyCode::Left), GamePhase::GameOver), None);
        assert_eq!(
            map_key_event(press(KeyCode::Enter), GamePhase::NotStarted),
            Some(InputAction::Start)
        );
        assert_eq!(
            map_key_event(press(KeyCode::Char('r')), GamePhase::GameOver),
            Some(InputAction::Start)
        );
        assert_eq!(map_key_event(press(KeyCode::Char('r')), GamePhase::Running), None);
        assert_eq!(
            map_key_event(press(KeyCode::Esc), GamePhase::Running),
            Some(InputAction::Quit)
        );
        assert_eq!(
            map_key_event(
                KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
                GamePhase::NotStarted
            ),
            Some(InputAction::Quit)
        );
    }

    #[test]
    fn test_repeat_counts_release_does_not() {
        let repeat = KeyEvent::new_with_kind(KeyCode::Right, KeyModifiers::NONE, KeyEventKind::Repeat);
        let release =
            KeyEvent::new_with_kind(KeyCode::Right, KeyModifiers::NONE, KeyEventKind::Release);
        assert_eq!(
            map_key_event(repeat, GamePhase::Running),
            Some(InputAction::Game(GameKey::ArrowRight))
        );
        assert_eq!(map_key_event(release, GamePhase::Running), None);
    }
}
