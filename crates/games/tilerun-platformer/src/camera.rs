use serde::{Deserialize, Serialize};

use tilerun_core::geometry::Rect;

use crate::level::WorldBounds;

/// Viewport width in world units.
pub const VIEWPORT_WIDTH: f32 = 600.0;
/// Viewport height in world units.
pub const VIEWPORT_HEIGHT: f32 = 400.0;

/// Camera settings, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Stop scrolling once the right edge of the world is on screen.
    pub clamp_right: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            clamp_right: false,
        }
    }
}

/// Horizontal offset that keeps `player_x` centred, never scrolling left of 0.
///
/// With `right_limit` the offset is also capped so the viewport does not run
/// past the end of the world. Non-finite positions map to 0.
pub fn follow_offset(player_x: f32, viewport_width: f32, right_limit: Option<f32>) -> f32 {
    if !player_x.is_finite() {
        return 0.0;
    }
    let mut offset = player_x - viewport_width / 2.0;
    if let Some(limit) = right_limit {
        offset = offset.min(limit);
    }
    offset.max(0.0)
}

/// Side-scrolling camera. Recomputed every tick from the player position.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    offset_x: f32,
    viewport_width: f32,
    clamp_right: bool,
    world_max_x: f32,
}

impl Camera {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            offset_x: 0.0,
            viewport_width: config.viewport_width,
            clamp_right: config.clamp_right,
            world_max_x: 0.0,
        }
    }

    /// Switch to a new level's bounds and snap back to the origin.
    pub fn reset(&mut self, bounds: WorldBounds) {
        self.world_max_x = bounds.max_x;
        self.offset_x = 0.0;
    }

    pub fn follow(&mut self, player_x: f32) -> f32 {
        let limit = self
            .clamp_right
            .then(|| (self.world_max_x - self.viewport_width).max(0.0));
        self.offset_x = follow_offset(player_x, self.viewport_width, limit);
        self.offset_x
    }

    pub fn offset_x(&self) -> f32 {
        self.offset_x
    }

    /// World rectangle shifted into screen space.
    pub fn to_screen(&self, rect: &Rect) -> Rect {
        rect.translated(-self.offset_x, 0.0)
    }
}
