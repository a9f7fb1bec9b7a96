use serde::{Deserialize, Serialize};

use tilerun_core::geometry::Rect;
use tilerun_core::input::InputIntent;

use crate::physics::{Contacts, Facing, KinematicBody, PhysicsConfig};

/// Player collision width.
pub const PLAYER_WIDTH: f32 = 16.0;
/// Player collision height.
pub const PLAYER_HEIGHT: f32 = 32.0;

/// Player body dimensions, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
        }
    }
}

/// Power-up size. Only tracked; nothing in the core changes it yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeState {
    #[default]
    Small,
    Big,
}

/// The controllable character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub body: KinematicBody,
    pub facing: Facing,
    pub on_ground: bool,
    pub size_state: SizeState,
}

impl Player {
    pub fn new(spawn_x: f32, spawn_y: f32, config: &PlayerConfig) -> Self {
        Self {
            body: KinematicBody::new(spawn_x, spawn_y, config.width, config.height),
            facing: Facing::Right,
            on_ground: false,
            size_state: SizeState::Small,
        }
    }

    /// Put the player back at a spawn point with all motion state cleared.
    pub fn respawn(&mut self, spawn_x: f32, spawn_y: f32) {
        self.body.rect.x = spawn_x;
        self.body.rect.y = spawn_y;
        self.body.vx = 0.0;
        self.body.vy = 0.0;
        self.facing = Facing::Right;
        self.on_ground = false;
        self.size_state = SizeState::Small;
    }

    /// Translate intent into velocity. Does not move the body.
    ///
    /// The jump gate is `vy == 0`, not `on_ground`: a body at the apex of a
    /// jump can jump again.
    pub fn apply_input(&mut self, intent: &InputIntent, physics: &PhysicsConfig) {
        let dir = intent.horizontal();
        self.body.vx = dir * physics.player_speed;
        if dir > 0.0 {
            self.facing = Facing::Right;
        } else if dir < 0.0 {
            self.facing = Facing::Left;
        }

        if intent.jump && self.body.vy == 0.0 {
            self.body.vy = physics.jump_force;
        }
    }

    /// Resolve the body against the level and refresh `on_ground`.
    pub fn update(&mut self, colliders: &[Rect], physics: &PhysicsConfig) -> Contacts {
        let contacts = self.body.update(colliders, physics);
        self.on_ground = contacts.landed;
        contacts
    }

    /// `apply_input` followed by `update`.
    pub fn tick(
        &mut self,
        intent: &InputIntent,
        colliders: &[Rect],
        physics: &PhysicsConfig,
    ) -> Contacts {
        self.apply_input(intent, physics);
        self.update(colliders, physics)
    }

    pub fn rect(&self) -> &Rect {
        &self.body.rect
    }
}
