use color_eyre::Result;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

use mini_galaga::input::{InputAction, InputManager};
use mini_galaga::renderer::{GameRenderer, RenderView};
use mini_galaga::{DrawList, EnemyId, FrameOutcome, Game, GameConfig, GameHooks, KeyOutcome};

use crate::audio::AudioManager;

/// Entries kept for the side panel; more than any terminal shows
const HIT_LOG_CAPACITY: usize = 256;

/// Destroyed enemies for the side panel, newest first.
/// Cleared whenever a new game starts.
#[derive(Debug, Default)]
pub struct HitLog {
    enemy_ids: VecDeque<EnemyId>,
}

impl HitLog {
    pub fn entries(&self) -> &VecDeque<EnemyId> {
        &self.enemy_ids
    }
}

impl GameHooks for HitLog {
    fn on_start_game(&mut self) {
        self.enemy_ids.clear();
    }

    fn on_enemy_hit(&mut self, enemy_id: EnemyId) {
        self.enemy_ids.push_front(enemy_id);
        self.enemy_ids.truncate(HIT_LOG_CAPACITY);
    }
}

/// The terminal host: owns the game and feeds it keys, time and frames
pub struct App {
    running: bool,
    game: Game<HitLog>,
    /// Last committed frame, replayed on every redraw
    frame: DrawList,
    last_frame_time: Instant,
    fps: u32,
    /// internal components
    input_manager: InputManager,
    renderer: GameRenderer,
    audio_manager: Option<AudioManager>,
}

impl App {
    pub fn new(config: GameConfig, seed: Option<u64>, audio_manager: Option<AudioManager>) -> Self {
        let game = match seed {
            Some(seed) => Game::with_seed(config, HitLog::default(), seed),
            None => Game::new(config, HitLog::default()),
        };

        Self {
            running: true,
            game,
            frame: DrawList::new(),
            last_frame_time: Instant::now(),
            fps: 0,
            input_manager: InputManager::new(),
            renderer: GameRenderer::new(),
            audio_manager,
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
        while self.running {
            // Calculate FPS and feed elapsed time to the game's timers
            let now = Instant::now();
            let frame_time = now.duration_since(self.last_frame_time);
            self.last_frame_time = now;
            if frame_time.as_micros() > 0 {
                self.fps = (1_000_000 / frame_time.as_micros()) as u32;
            }
            self.game.advance_clock(frame_time);

            // Poll input events and process them in arrival order
            self.input_manager.poll_events(self.game.phase())?;
            for action in self.input_manager.take_actions() {
                self.process_action(action);
            }

            match self.game.animation_frame(Some(&mut self.frame)) {
                FrameOutcome::Idle => {}
                FrameOutcome::Advanced { hits } => self.play_hits(hits),
                FrameOutcome::GameOver { final_score, hits } => {
                    self.play_hits(hits);
                    log::info!("Final score {final_score}");
                }
            }

            terminal.draw(|frame| {
                let view = RenderView {
                    phase: self.game.phase(),
                    score: self.game.score(),
                    field: self.game.config().field,
                    frame: &self.frame,
                    hit_log: self.game.hooks().entries(),
                    fps: self.fps,
                };
                self.renderer.render(frame, &view);
            })?;

            // Small sleep to maintain ~60 FPS and prevent CPU spinning
            std::thread::sleep(Duration::from_millis(8));
        }
        Ok(())
    }

    fn process_action(&mut self, action: InputAction) {
        match action {
            InputAction::Quit => {
                self.running = false;
            }
            InputAction::Start => {
                if !self.game.phase().is_running() {
                    self.frame = DrawList::new();
                    self.game.start();
                }
            }
            InputAction::Game(key) => {
                if let KeyOutcome::Fired(_) = self.game.handle_key(key)
                    && let Some(audio) = &self.audio_manager
                {
                    audio.play_fire_sound();
                }
            }
        }
    }

    fn play_hits(&self, hits: usize) {
        if hits > 0
            && let Some(audio) = &self.audio_manager
        {
            audio.play_hit_sound();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_log_newest_first_and_cleared_on_start() {
        let mut log = HitLog::default();
        log.on_enemy_hit(EnemyId(1));
        log.on_enemy_hit(EnemyId(2));
        assert!(log.entries().iter().eq(&[EnemyId(2), EnemyId(1)]));

        log.on_start_game();
        assert!(log.entries().is_empty());
    }

    #[test]
    fn test_hit_log_keeps_newest_up_to_capacity() {
        let mut log = HitLog::default();
        for id in 0..(HIT_LOG_CAPACITY as u64 + 10) {
            log.on_enemy_hit(EnemyId(id));
        }
        assert_eq!(log.entries().len(), HIT_LOG_CAPACITY);
        assert_eq!(log.entries().front(), Some(&EnemyId(HIT_LOG_CAPACITY as u64 + 9)));
        assert_eq!(log.entries().back(), Some(&EnemyId(10)));
    }

    #[test]
    fn test_start_action_only_outside_running() {
        let mut app = App::new(GameConfig::default(), Some(5), None);
        app.process_action(InputAction::Start);
        assert!(app.game.phase().is_running());

        app.process_action(InputAction::Game(mini_galaga::GameKey::Space));
        assert_eq!(app.game.world().lasers.len(), 1);

        // A second start while running must not wipe the game
        app.process_action(InputAction::Start);
        assert_eq!(app.game.world().lasers.len(), 1);

        app.process_action(InputAction::Quit);
        assert!(!app.running);
    }
}
