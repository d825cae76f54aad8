//! Game tuning constants
//!
//! Every number the simulation uses lives here. The defaults are the shipped
//! game; a JSON file can override any subset of them.

use std::fs;
use std::path::Path;
use std::time::Duration;

use color_eyre::eyre::{Result, WrapErr, ensure};
use serde::{Deserialize, Serialize};

use crate::pixel_art::{ENEMY_ART, PLAYER_ART};

/// Size of the play field in logical units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Default for Field {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 720.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub field: Field,
    /// Units the ship moves per arrow key press
    pub player_step: f32,
    /// Gap between the ship's bottom edge and the bottom of the field
    pub player_bottom_margin: f32,
    /// Units a laser climbs per frame
    pub laser_speed: f32,
    pub laser_width: f32,
    pub laser_height: f32,
    pub base_enemy_speed: f32,
    pub enemy_speed_step: f32,
    pub speed_ramp_interval_ms: u64,
    pub enemy_spawn_interval_ms: u64,
    pub fire_cooldown_ms: u64,
    pub score_per_hit: u32,
    /// Canvas units per art pixel
    pub pixel_scale: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field: Field::default(),
            player_step: 10.0,
            player_bottom_margin: 10.0,
            laser_speed: 15.0,
            laser_width: 2.0,
            laser_height: 10.0,
            base_enemy_speed: 1.0,
            enemy_speed_step: 0.2,
            speed_ramp_interval_ms: 10_000,
            enemy_spawn_interval_ms: 1_000,
            fire_cooldown_ms: 100,
            score_per_hit: 10,
            pixel_scale: 4.0,
        }
    }
}

impl GameConfig {
    /// Reads a JSON config file. Missing keys fall back to the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .wrap_err_with(|| format!("failed to parse config file {}", path.display()))?;
        config.validate()?;
        log::info!("Loaded game config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.field.width > 0.0 && self.field.height > 0.0,
            "field dimensions must be positive, got {}x{}",
            self.field.width,
            self.field.height
        );
        ensure!(self.pixel_scale > 0.0, "pixel_scale must be positive");
        ensure!(
            self.enemy_spawn_interval_ms > 0 && self.speed_ramp_interval_ms > 0,
            "spawn and speed ramp intervals must be non-zero"
        );
        ensure!(
            self.ship_width() <= self.field.width && self.enemy_width() <= self.field.width,
            "field width {} is narrower than the sprites",
            self.field.width
        );
        ensure!(
            self.ship_height() + self.player_bottom_margin < self.field.height,
            "field height {} leaves no room for the ship",
            self.field.height
        );
        ensure!(
            self.laser_width > 0.0 && self.laser_height > 0.0,
            "laser dimensions must be positive"
        );
        ensure!(
            self.laser_speed > 0.0,
            "laser_speed must be positive, got {}",
            self.laser_speed
        );
        ensure!(
            self.player_step > 0.0,
            "player_step must be positive, got {}",
            self.player_step
        );
        ensure!(
            self.base_enemy_speed > 0.0,
            "base_enemy_speed must be positive, got {}",
            self.base_enemy_speed
        );
        // Speed only ever ramps up within a game
        ensure!(
            self.enemy_speed_step >= 0.0,
            "enemy_speed_step must not be negative, got {}",
            self.enemy_speed_step
        );
        Ok(())
    }

    pub fn ship_width(&self) -> f32 {
        PLAYER_ART[0].len() as f32 * self.pixel_scale
    }

    pub fn ship_height(&self) -> f32 {
        PLAYER_ART.len() as f32 * self.pixel_scale
    }

    pub fn enemy_width(&self) -> f32 {
        ENEMY_ART[0].len() as f32 * self.pixel_scale
    }

    pub fn enemy_height(&self) -> f32 {
        ENEMY_ART.len() as f32 * self.pixel_scale
    }

    /// Fixed vertical offset of the ship's top edge; lasers spawn here too
    pub fn ship_y(&self) -> f32 {
        self.field.height - self.ship_height() - self.player_bottom_margin
    }

    /// Rightmost legal ship position
    pub fn max_player_x(&self) -> f32 {
        self.field.width - self.ship_width()
    }

    pub fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.enemy_spawn_interval_ms)
    }

    pub fn speed_ramp_interval(&self) -> Duration {
        Duration::from_millis(self.speed_ramp_interval_ms)
    }

    pub fn fire_cooldown(&self) -> Duration {
        Duration::from_millis(self.fire_cooldown_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_geometry() {
        let config = GameConfig::default();
        assert_eq!(config.ship_width(), 20.0);
        assert_eq!(config.ship_height(), 12.0);
        assert_eq!(config.enemy_width(), 20.0);
        assert_eq!(config.enemy_height(), 12.0);
        assert_eq!(config.ship_y(), 698.0);
        assert_eq!(config.max_player_x(), 380.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "laser_speed": 20.0, "fire_cooldown_ms": 250 }}"#).unwrap();

        let config = GameConfig::load(file.path()).unwrap();
        assert_eq!(config.laser_speed, 20.0);
        assert_eq!(config.fire_cooldown(), Duration::from_millis(250));
        assert_eq!(config.field, Field::default());
        assert_eq!(config.score_per_hit, 10);
    }

    #[test]
    fn test_load_rejects_zero_interval() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "enemy_spawn_interval_ms": 0 }}"#).unwrap();

        assert!(GameConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_load_rejects_non_positive_speeds() {
        for body in [
            r#"{ "base_enemy_speed": 0.0 }"#,
            r#"{ "base_enemy_speed": -1.0 }"#,
            r#"{ "enemy_speed_step": -0.5 }"#,
            r#"{ "laser_speed": 0.0 }"#,
            r#"{ "laser_speed": -15.0 }"#,
            r#"{ "player_step": 0.0 }"#,
            r#"{ "player_step": -10.0 }"#,
        ] {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            write!(file, "{body}").unwrap();
            assert!(GameConfig::load(file.path()).is_err(), "accepted {body}");
        }
    }

    #[test]
    fn test_zero_speed_step_is_allowed() {
        let config = GameConfig {
            enemy_speed_step: 0.0,
            ..GameConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = GameConfig::load(file.path()).unwrap_err();
        assert!(format!("{err:?}").contains("failed to parse"));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(GameConfig::load(Path::new("/definitely/not/here.json")).is_err());
    }
}
