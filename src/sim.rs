//! Per-frame simulation step
//!
//! Pure function of the committed world: the game decides whether to commit
//! the result or freeze on a loss.

use std::collections::HashSet;

use crate::config::GameConfig;
use crate::entities::{Enemy, EnemyId, Laser, LaserId, Player};

/// Everything that moves, as of the last committed frame
#[derive(Debug, Clone, PartialEq)]
pub struct World {
    pub player: Player,
    /// Live lasers in fire order; draw order follows it
    pub lasers: Vec<Laser>,
    /// Live enemies in spawn order
    pub enemies: Vec<Enemy>,
}

impl World {
    /// Ship centered, nothing in flight
    pub fn new(config: &GameConfig) -> Self {
        Self {
            player: Player::new(
                config.field.width / 2.0,
                config.ship_y(),
                config.ship_width(),
                config.ship_height(),
            ),
            lasers: Vec::new(),
            enemies: Vec::new(),
        }
    }

    pub fn reset(&mut self, config: &GameConfig) {
        *self = Self::new(config);
    }
}

/// One laser overlapping one enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub enemy: EnemyId,
    pub laser: LaserId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    /// Surviving lasers, advanced
    pub lasers: Vec<Laser>,
    /// Surviving enemies, advanced
    pub enemies: Vec<Enemy>,
    /// Every overlapping (enemy, laser) pair, enemy-major order
    pub hits: Vec<Hit>,
    /// An enemy reached the bottom or touched the ship
    pub lost: bool,
}

/// Advances lasers and enemies one frame and resolves collisions.
///
/// Every overlapping pair is a hit: a laser crossing two enemies in the same
/// frame destroys both, and two lasers inside one enemy score twice.
pub fn step(world: &World, enemy_speed: f32, config: &GameConfig) -> StepOutcome {
    let lasers: Vec<Laser> = world
        .lasers
        .iter()
        .cloned()
        .map(|mut laser| {
            laser.update(config.laser_speed);
            laser
        })
        .filter(|laser| !laser.has_exited(config.laser_height))
        .collect();

    let advanced: Vec<Enemy> = world
        .enemies
        .iter()
        .cloned()
        .map(|mut enemy| {
            enemy.update(enemy_speed);
            enemy
        })
        .collect();

    let player_bounds = world.player.bounds();
    let mut lost = false;
    let mut hits = Vec::new();
    let mut hit_enemies = HashSet::new();
    let mut hit_lasers = HashSet::new();
    let mut escaped = HashSet::new();

    for enemy in &advanced {
        let enemy_bounds = enemy.bounds();

        if enemy.reached_bottom(config.field.height) {
            escaped.insert(enemy.id);
            lost = true;
        }
        if enemy_bounds.overlaps(&player_bounds) {
            lost = true;
        }

        for laser in &lasers {
            if laser
                .bounds(config.laser_width, config.laser_height)
                .overlaps(&enemy_bounds)
            {
                hits.push(Hit {
                    enemy: enemy.id,
                    laser: laser.id,
                });
                hit_enemies.insert(enemy.id);
                hit_lasers.insert(laser.id);
            }
        }
    }

    let lasers = lasers
        .into_iter()
        .filter(|laser| !hit_lasers.contains(&laser.id))
        .collect();
    let enemies = advanced
        .into_iter()
        .filter(|enemy| !hit_enemies.contains(&enemy.id) && !escaped.contains(&enemy.id))
        .collect();

    StepOutcome {
        lasers,
        enemies,
        hits,
        lost,
    }
}
