use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::camera::CameraConfig;
use crate::game_loop::{DEFAULT_FPS, LoopConfig};
use crate::level::LevelRules;
use crate::physics::PhysicsConfig;
use crate::player::PlayerConfig;
use crate::render::Palette;
use crate::rules::RulesConfig;

/// Default config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/tilerun.toml";

/// Top-level game configuration, loaded from `config/tilerun.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TilerunConfig {
    pub physics: PhysicsConfig,
    pub level: LevelRules,
    pub player: PlayerConfig,
    pub camera: CameraConfig,
    pub game_loop: LoopConfig,
    pub rules: RulesConfig,
    pub palette: Palette,
}

impl TilerunConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load config from `TILERUN_CONFIG` or the default path, then apply env var overrides.
    pub fn load() -> Self {
        let path = std::env::var("TILERUN_CONFIG")
            .ok()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::load_from(&path);

        if let Ok(val) = std::env::var("TILERUN_MAX_TICKS")
            && let Ok(n) = val.parse::<u64>()
        {
            config.game_loop.max_ticks = Some(n);
        }

        config.validate();
        config
    }

    /// Read one config file, falling back to defaults when it is missing or malformed.
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(cfg) => {
                    tracing::info!(path = %path.display(), "Loaded configuration");
                    cfg
                },
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        "Failed to parse config: {e}, using defaults"
                    );
                    Self::default()
                },
            },
            Err(_) => {
                tracing::info!(path = %path.display(), "No config file found, using defaults");
                Self::default()
            },
        }
    }

    /// Replace values the simulation cannot run with, logging each fix.
    pub fn validate(&mut self) {
        let fps = self.game_loop.fps;
        if !fps.is_finite() || fps <= 0.0 {
            tracing::warn!(fps, "game_loop.fps must be > 0, using {DEFAULT_FPS}");
            self.game_loop.fps = DEFAULT_FPS;
        }
        if self.level.tile_size <= 0 {
            tracing::warn!(
                tile_size = self.level.tile_size,
                "level.tile_size must be > 0, using default"
            );
            self.level.tile_size = LevelRules::default().tile_size;
        }

        let camera = CameraConfig::default();
        positive(&mut self.camera.viewport_width, camera.viewport_width, "camera.viewport_width");

        let physics = PhysicsConfig::default();
        finite(&mut self.physics.gravity, physics.gravity, "physics.gravity");
        finite(&mut self.physics.player_speed, physics.player_speed, "physics.player_speed");
        finite(&mut self.physics.jump_force, physics.jump_force, "physics.jump_force");
        if let Some(max) = self.physics.max_fall_speed
            && !(max.is_finite() && max > 0.0)
        {
            tracing::warn!(max, "physics.max_fall_speed must be > 0, disabling");
            self.physics.max_fall_speed = None;
        }

        let player = PlayerConfig::default();
        positive(&mut self.player.width, player.width, "player.width");
        positive(&mut self.player.height, player.height, "player.height");

        let rules = LevelRules::default();
        positive(&mut self.level.enemy_width, rules.enemy_width, "level.enemy_width");
        positive(&mut self.level.enemy_height, rules.enemy_height, "level.enemy_height");
        finite(&mut self.level.enemy_speed, rules.enemy_speed, "level.enemy_speed");
    }
}

fn finite(value: &mut f32, default: f32, name: &str) {
    if !value.is_finite() {
        tracing::warn!(value = *value, "{name} must be finite, using {default}");
        *value = default;
    }
}

fn positive(value: &mut f32, default: f32, name: &str) {
    if !(value.is_finite() && *value > 0.0) {
        tracing::warn!(value = *value, "{name} must be > 0, using {default}");
        *value = default;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{GRAVITY, JUMP_FORCE, PLAYER_SPEED};

    #[test]
    fn default_config_values() {
        let cfg = TilerunConfig::default();
        assert_eq!(cfg.physics.gravity, GRAVITY);
        assert_eq!(cfg.physics.player_speed, PLAYER_SPEED);
        assert_eq!(cfg.physics.jump_force, JUMP_FORCE);
        assert!(cfg.physics.max_fall_speed.is_none());
        assert_eq!(cfg.level.tile_size, 16);
        assert_eq!(cfg.player.height, 32.0);
        assert_eq!(cfg.camera.viewport_width, 600.0);
        assert_eq!(cfg.game_loop.fps, 60.0);
        assert!(cfg.game_loop.max_ticks.is_none());
    }

    #[test]
    fn parse_partial_toml() {
        let toml_str = r##"
[physics]
gravity = 0.25
max_fall_speed = 12.0

[camera]
clamp_right = true

[palette]
sky = "#000000"
"##;
        let cfg = TilerunConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(cfg.physics.gravity, 0.25);
        assert_eq!(cfg.physics.player_speed, PLAYER_SPEED);
        assert_eq!(cfg.physics.max_fall_speed, Some(12.0));
        assert!(cfg.camera.clamp_right);
        assert_eq!(cfg.palette.sky.to_string(), "#000000");
        assert_eq!(cfg.rules.death_y, 480.0);
    }

    #[test]
    fn shipped_config_parses() {
        let text = include_str!("../../../../config/tilerun.toml");
        let cfg = TilerunConfig::from_toml_str(text).unwrap();
        assert_eq!(cfg.palette, crate::render::Palette::default());
        assert_eq!(cfg.rules.death_y, 480.0);
        assert!(cfg.game_loop.max_ticks.is_none());
    }

    #[test]
    fn bad_colour_is_a_parse_error() {
        assert!(TilerunConfig::from_toml_str("[palette]\nsky = \"blue\"").is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = TilerunConfig::load_from("no/such/tilerun.toml");
        assert_eq!(cfg.game_loop.fps, 60.0);
    }

    #[test]
    fn validate_repairs_unusable_values() {
        let mut cfg = TilerunConfig::from_toml_str(
            "[game_loop]\nfps = 0.0\n[level]\ntile_size = -4\n[physics]\nmax_fall_speed = -1.0",
        )
        .unwrap();
        cfg.validate();
        assert_eq!(cfg.game_loop.fps, DEFAULT_FPS);
        assert_eq!(cfg.level.tile_size, 16);
        assert!(cfg.physics.max_fall_speed.is_none());
    }

    #[test]
    fn validate_repairs_non_finite_values() {
        let mut cfg = TilerunConfig::default();
        cfg.physics.gravity = f32::NAN;
        cfg.physics.player_speed = f32::INFINITY;
        cfg.physics.jump_force = f32::NEG_INFINITY;
        cfg.physics.max_fall_speed = Some(f32::NAN);
        cfg.player.width = f32::NAN;
        cfg.player.height = 0.0;
        cfg.level.enemy_width = f32::INFINITY;
        cfg.level.enemy_height = -2.0;
        cfg.level.enemy_speed = f32::NAN;
        cfg.camera.viewport_width = f32::INFINITY;
        cfg.validate();

        let defaults = TilerunConfig::default();
        assert_eq!(cfg.physics.gravity, GRAVITY);
        assert_eq!(cfg.physics.player_speed, PLAYER_SPEED);
        assert_eq!(cfg.physics.jump_force, JUMP_FORCE);
        assert!(cfg.physics.max_fall_speed.is_none());
        assert_eq!(cfg.player.width, defaults.player.width);
        assert_eq!(cfg.player.height, defaults.player.height);
        assert_eq!(cfg.level.enemy_width, defaults.level.enemy_width);
        assert_eq!(cfg.level.enemy_height, defaults.level.enemy_height);
        assert_eq!(cfg.level.enemy_speed, defaults.level.enemy_speed);
        assert_eq!(cfg.camera.viewport_width, defaults.camera.viewport_width);
    }

    #[test]
    fn validate_keeps_usable_values() {
        let mut cfg = TilerunConfig::default();
        cfg.physics.gravity = -0.5;
        cfg.physics.jump_force = 0.0;
        cfg.level.enemy_speed = -1.0;
        cfg.player.width = 8.0;
        cfg.validate();
        assert_eq!(cfg.physics.gravity, -0.5);
        assert_eq!(cfg.physics.jump_force, 0.0);
        assert_eq!(cfg.level.enemy_speed, -1.0);
        assert_eq!(cfg.player.width, 8.0);
    }
}
