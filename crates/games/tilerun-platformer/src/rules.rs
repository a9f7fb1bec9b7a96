use serde::{Deserialize, Serialize};

use crate::GameSession;

/// Default y below which a falling player counts as dead.
pub const DEATH_Y: f32 = 480.0;

/// Win/lose predicates checked after every simulated tick.
/// Both default to never firing.
pub trait GameRules: Send {
    fn player_died(&self, _session: &GameSession) -> bool {
        false
    }

    fn level_ended(&self, _session: &GameSession) -> bool {
        false
    }
}

/// Rules that never fire. The session stays in PLAYING until told otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRules;

impl GameRules for NoRules {}

/// Tunables for [`FallOutRules`], loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub death_y: f32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self { death_y: DEATH_Y }
    }
}

/// Death by falling out of the world; level end by walking off its right edge.
#[derive(Debug, Clone, Copy)]
pub struct FallOutRules {
    pub death_y: f32,
}

impl FallOutRules {
    pub fn new(config: &RulesConfig) -> Self {
        Self {
            death_y: config.death_y,
        }
    }
}

impl GameRules for FallOutRules {
    fn player_died(&self, session: &GameSession) -> bool {
        session.player().body.rect.top() > self.death_y
    }

    fn level_ended(&self, session: &GameSession) -> bool {
        let max_x = session.level().bounds().max_x;
        max_x > 0.0 && session.player().body.rect.left() >= max_x
    }
}
