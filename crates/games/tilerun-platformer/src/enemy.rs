use serde::{Deserialize, Serialize};

use tilerun_core::geometry::Rect;

use crate::physics::{Facing, KinematicBody};

/// Enemy collision width.
pub const ENEMY_WIDTH: f32 = 16.0;
/// Enemy collision height.
pub const ENEMY_HEIGHT: f32 = 16.0;
/// Patrol speed (units/tick).
pub const ENEMY_SPEED: f32 = 2.0;

/// Result of one patrol step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Patrol {
    /// Still over ground after moving.
    Walked,
    /// Stepped past a ledge and reversed.
    Turned,
    /// Nothing to sample against; facing is left unchanged.
    NoGround,
}

/// A walker that patrols back and forth, turning at ledges.
///
/// Enemies do not fall; they are expected to be placed on walkable ground.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub body: KinematicBody,
    pub facing: Facing,
    pub speed: f32,
}

impl Enemy {
    pub fn new(x: f32, y: f32, width: f32, height: f32, speed: f32) -> Self {
        Self {
            body: KinematicBody::new(x, y, width, height),
            facing: Facing::Left,
            speed,
        }
    }

    /// Walk one tick, then turn around if the bottom-centre point is over empty space.
    pub fn update(&mut self, colliders: &[Rect]) -> Patrol {
        self.body.vx = self.facing.sign() * self.speed;
        self.body.rect.x += self.body.vx;

        if colliders.is_empty() {
            tracing::trace!(x = self.body.rect.x, "enemy has no ground reference");
            return Patrol::NoGround;
        }

        let (px, py) = self.body.rect.mid_bottom();
        if colliders.iter().any(|c| c.contains_point(px, py)) {
            Patrol::Walked
        } else {
            self.facing = self.facing.flipped();
            Patrol::Turned
        }
    }

    pub fn rect(&self) -> &Rect {
        &self.body.rect
    }
}
