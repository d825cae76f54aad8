//! Enemy emission and the speed ramp
//!
//! Both run off interval timers armed by the game on every start.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::GameConfig;
use crate::entities::{Enemy, EnemyId};
use crate::timers::{Scheduler, TimerKind};

/// Shared fall speed of every live enemy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemySpeed {
    current: f32,
    base: f32,
    step: f32,
}

impl EnemySpeed {
    pub fn new(base: f32, step: f32) -> Self {
        Self {
            current: base,
            base,
            step,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.base_enemy_speed, config.enemy_speed_step)
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    /// One tick of the ramp; there is no upper bound
    pub fn ramp(&mut self) {
        self.current += self.step;
    }

    pub fn reset(&mut self) {
        self.current = self.base;
    }
}

pub struct Spawner {
    rng: StdRng,
    next_enemy_id: u64,
}

impl Spawner {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    /// Deterministic spawn positions, for tests and replays
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng,
            next_enemy_id: 0,
        }
    }

    /// Arms fresh emission and ramp intervals. Called on every (re)start after
    /// the scheduler has been cleared.
    pub fn arm(&self, scheduler: &mut Scheduler, config: &GameConfig) {
        scheduler.set_interval(TimerKind::SpawnEnemy, config.spawn_interval());
        scheduler.set_interval(TimerKind::RampSpeed, config.speed_ramp_interval());
    }

    /// A new enemy at the top of the field with a random horizontal start.
    /// Ids keep counting across restarts so they never repeat.
    pub fn spawn_enemy(&mut self, config: &GameConfig) -> Enemy {
        let width = config.enemy_width();
        let height = config.enemy_height();
        let max_x = (config.field.width - width).max(0.0);
        let x = if max_x > 0.0 {
            self.rng.random_range(0.0..=max_x)
        } else {
            0.0
        };

        let id = EnemyId(self.next_enemy_id);
        self.next_enemy_id += 1;
        Enemy::new(id, x, 0.0, width, height)
    }
}

impl Default for Spawner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_speed_ramp_and_reset() {
        let mut speed = EnemySpeed::new(1.0, 0.2);
        assert_eq!(speed.current(), 1.0);
        speed.ramp();
        assert!((speed.current() - 1.2).abs() < 1e-6);
        speed.ramp();
        assert!((speed.current() - 1.4).abs() < 1e-6);
        speed.reset();
        assert_eq!(speed.current(), 1.0);
    }

    #[test]
    fn test_spawned_enemy_shape() {
        let config = GameConfig::default();
        let mut spawner = Spawner::with_seed(1);
        let enemy = spawner.spawn_enemy(&config);
        assert_eq!(enemy.y, 0.0);
        assert_eq!(enemy.width, 20.0);
        assert_eq!(enemy.height, 12.0);
        assert!((0.0..=380.0).contains(&enemy.x));
    }

    #[test]
    fn test_enemy_ids_are_unique() {
        let config = GameConfig::default();
        let mut spawner = Spawner::with_seed(3);
        let ids: Vec<_> = (0..50).map(|_| spawner.spawn_enemy(&config).id).collect();
        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(ids.len(), deduped.len());
    }

    #[test]
    fn test_same_seed_same_positions() {
        let config = GameConfig::default();
        let mut a = Spawner::with_seed(99);
        let mut b = Spawner::with_seed(99);
        for _ in 0..10 {
            assert_eq!(a.spawn_enemy(&config).x, b.spawn_enemy(&config).x);
        }
    }

    #[test]
    fn test_arm_sets_both_intervals() {
        let config = GameConfig::default();
        let mut scheduler = Scheduler::new();
        Spawner::with_seed(0).arm(&mut scheduler, &config);
        assert!(scheduler.is_pending(TimerKind::SpawnEnemy));
        assert!(scheduler.is_pending(TimerKind::RampSpeed));

        let until = Duration::from_millis(10_000);
        let mut spawns = 0;
        let mut ramps = 0;
        while let Some(kind) = scheduler.pop_due(until) {
            match kind {
                TimerKind::SpawnEnemy => spawns += 1,
                TimerKind::RampSpeed => ramps += 1,
                TimerKind::ReopenFireGate => unreachable!(),
            }
        }
        assert_eq!(spawns, 10);
        assert_eq!(ramps, 1);
    }

    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_spawn_x_within_field(seed in any::<u64>()) {
                let config = GameConfig::default();
                let mut spawner = Spawner::with_seed(seed);
                for _ in 0..20 {
                    let enemy = spawner.spawn_enemy(&config);
                    prop_assert!(enemy.x >= 0.0);
                    prop_assert!(enemy.x + enemy.width <= config.field.width);
                }
            }

            #[test]
            fn test_speed_never_decreases(ticks in 0usize..200) {
                let mut speed = EnemySpeed::new(1.0, 0.2);
                let mut last = speed.current();
                for _ in 0..ticks {
                    speed.ramp();
                    prop_assert!(speed.current() >= last);
                    last = speed.current();
                }
            }
        }
    }
}
