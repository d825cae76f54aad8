//! Game state machine
//!
//! `Game` is the single authoritative state container. The host feeds it three
//! kinds of events, one at a time: key-downs, clock advances (which fire due
//! timers) and animation frames. Every handler reads the current phase, so a
//! timer or key arriving after game over is a no-op.

use std::time::Duration;

use log::{debug, info, trace};

use crate::config::GameConfig;
use crate::entities::{EnemyId, GamePhase, Laser};
use crate::input::{GameKey, InputController, KeyOutcome};
use crate::pixel_art::{DrawSurface, ENEMY_ART, PLAYER_ART, Shade, draw_pixel_art};
use crate::sim::{self, World};
use crate::spawner::{EnemySpeed, Spawner};
use crate::timers::{Scheduler, TimerKind};

/// Where the score text is drawn
const SCORE_TEXT_POS: (f32, f32) = (10.0, 30.0);

/// Notifications to whoever embeds the game.
///
/// Both are fire-and-forget: the game never looks at what they do.
pub trait GameHooks {
    /// Once per `start()`/`restart()`, before the new episode begins
    fn on_start_game(&mut self) {}

    /// Once per destroyed (enemy, laser) pair
    fn on_enemy_hit(&mut self, _enemy_id: EnemyId) {}
}

impl GameHooks for () {}

/// Result of one animation frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    /// No frame was scheduled, or there was nothing to draw on
    Idle,
    Advanced { hits: usize },
    /// This frame ended the game
    GameOver { final_score: u32, hits: usize },
}

pub struct Game<H: GameHooks = ()> {
    config: GameConfig,
    phase: GamePhase,
    world: World,
    enemy_speed: EnemySpeed,
    score: u32,
    scheduler: Scheduler,
    spawner: Spawner,
    /// Present only while running
    input: Option<InputController>,
    frame_scheduled: bool,
    hooks: H,
}

impl<H: GameHooks> Game<H> {
    pub fn new(config: GameConfig, hooks: H) -> Self {
        Self::with_spawner(config, hooks, Spawner::new())
    }

    /// Same enemy positions on every run with the same seed
    pub fn with_seed(config: GameConfig, hooks: H, seed: u64) -> Self {
        Self::with_spawner(config, hooks, Spawner::with_seed(seed))
    }

    fn with_spawner(config: GameConfig, hooks: H, spawner: Spawner) -> Self {
        Self {
            world: World::new(&config),
            enemy_speed: EnemySpeed::from_config(&config),
            config,
            phase: GamePhase::NotStarted,
            score: 0,
            scheduler: Scheduler::new(),
            spawner,
            input: None,
            frame_scheduled: false,
            hooks,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn enemy_speed(&self) -> f32 {
        self.enemy_speed.current()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Direct access for hosts and tests that need to stage a position
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    /// Time on the game's virtual clock
    pub fn clock(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn is_frame_scheduled(&self) -> bool {
        self.frame_scheduled
    }

    pub fn fire_gate_open(&self) -> bool {
        self.input
            .as_ref()
            .is_some_and(InputController::fire_gate_open)
    }

    /// Resets everything and enters `Running`. Valid from any phase.
    pub fn start(&mut self) {
        self.hooks.on_start_game();

        self.scheduler.cancel_all();
        self.world.reset(&self.config);
        self.enemy_speed.reset();
        self.score = 0;
        self.input = Some(InputController::new());
        self.spawner.arm(&mut self.scheduler, &self.config);
        self.phase = GamePhase::Running;
        self.frame_scheduled = true;

        info!("Game started at {:?}", self.scheduler.now());
    }

    pub fn restart(&mut self) {
        self.start();
    }

    fn end_game(&mut self) {
        self.phase = GamePhase::GameOver;
        self.input = None;
        self.scheduler.cancel_all();
        self.frame_scheduled = false;

        info!("Game over with score {}", self.score);
    }

    /// One key-down from the keyboard subscription
    pub fn handle_key(&mut self, key: GameKey) -> KeyOutcome {
        let Some(controller) = self.input.as_mut() else {
            trace!("Ignoring {key:?} while {}", self.phase);
            return KeyOutcome::Ignored;
        };

        let outcome = controller.handle_key(key, &mut self.world.player, &self.config);
        match &outcome {
            KeyOutcome::Fired(laser) => {
                debug!("Fired {} at x={}", laser.id, laser.x);
                self.world.lasers.push(laser.clone());
                self.scheduler
                    .set_timeout(TimerKind::ReopenFireGate, self.config.fire_cooldown());
            }
            KeyOutcome::FireDropped => trace!("Fire dropped, gate closed"),
            KeyOutcome::Moved { .. } | KeyOutcome::Ignored => {}
        }
        outcome
    }

    /// Moves the clock forward, firing every timer that comes due on the way
    pub fn advance_clock(&mut self, dt: Duration) {
        let until = self.scheduler.now() + dt;
        while let Some(kind) = self.scheduler.pop_due(until) {
            self.on_timer(kind);
        }
        self.scheduler.settle(until);
    }

    fn on_timer(&mut self, kind: TimerKind) {
        if !self.phase.is_running() {
            trace!("Stale {kind:?} timer while {}", self.phase);
            return;
        }

        match kind {
            TimerKind::SpawnEnemy => {
                let enemy = self.spawner.spawn_enemy(&self.config);
                debug!("Spawned enemy {} at x={:.1}", enemy.id, enemy.x);
                self.world.enemies.push(enemy);
            }
            TimerKind::RampSpeed => {
                self.enemy_speed.ramp();
                debug!("Enemy speed now {:.2}", self.enemy_speed.current());
            }
            TimerKind::ReopenFireGate => {
                if let Some(controller) = self.input.as_mut() {
                    controller.reopen_fire_gate();
                }
            }
        }
    }

    /// One display refresh. Runs the simulation step against the current state,
    /// then either commits and draws it or freezes on a loss.
    ///
    /// Without a surface the frame is skipped and the loop stays scheduled.
    pub fn animation_frame<S>(&mut self, surface: Option<&mut S>) -> FrameOutcome
    where
        S: DrawSurface + ?Sized,
    {
        if !self.frame_scheduled || !self.phase.is_running() {
            return FrameOutcome::Idle;
        }
        let Some(surface) = surface else {
            return FrameOutcome::Idle;
        };

        let outcome = sim::step(&self.world, self.enemy_speed.current(), &self.config);
        let hits = outcome.hits.len();
        for hit in &outcome.hits {
            self.score = self.score.saturating_add(self.config.score_per_hit);
            debug!("{} destroyed enemy {}", hit.laser, hit.enemy);
            self.hooks.on_enemy_hit(hit.enemy);
        }

        if outcome.lost {
            self.end_game();
            return FrameOutcome::GameOver {
                final_score: self.score,
                hits,
            };
        }

        self.world.lasers = outcome.lasers;
        self.world.enemies = outcome.enemies;
        self.draw(surface);

        self.frame_scheduled = self.phase.is_running();
        FrameOutcome::Advanced { hits }
    }

    /// Paints the committed world: ship, lasers, enemies, score
    pub fn draw<S>(&self, surface: &mut S)
    where
        S: DrawSurface + ?Sized,
    {
        let scale = self.config.pixel_scale;
        let player = &self.world.player;

        surface.clear();
        draw_pixel_art(surface, &PLAYER_ART, player.x, player.y, scale, Shade::Player);

        for laser in &self.world.lasers {
            surface.fill_rect(
                self.laser_draw_x(laser),
                laser.y,
                self.config.laser_width,
                self.config.laser_height,
                Shade::Laser,
            );
        }

        for enemy in &self.world.enemies {
            draw_pixel_art(surface, &ENEMY_ART, enemy.x, enemy.y, scale, Shade::Enemy);
        }

        let (text_x, text_y) = SCORE_TEXT_POS;
        surface.fill_text(text_x, text_y, &format!("Score: {}", self.score), Shade::Text);
    }

    /// Lasers are drawn centered on the ship they left
    fn laser_draw_x(&self, laser: &Laser) -> f32 {
        laser.x + self.config.ship_width() / 2.0 - self.config.laser_width / 2.0
    }
}
