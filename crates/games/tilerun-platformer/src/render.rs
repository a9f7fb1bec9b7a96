use serde::{Deserialize, Serialize};

use tilerun_core::frame::{Drawable, FrameSnapshot, Rgb, SpriteKind};

use crate::GameSession;
use crate::level::TileKind;

/// Colours handed to the renderer for each sprite kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub sky: Rgb,
    pub ground: Rgb,
    pub pipe: Rgb,
    pub brick: Rgb,
    pub player: Rgb,
    pub enemy: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            sky: Rgb::new(0x6B, 0xE0, 0xF7),
            ground: Rgb::new(0x6B, 0x8C, 0x42),
            pipe: Rgb::new(0x2E, 0x9E, 0x3A),
            brick: Rgb::new(0xC5, 0x6B, 0x31),
            player: Rgb::new(0xFF, 0x00, 0x00),
            enemy: Rgb::new(0xA5, 0x2A, 0x2A),
        }
    }
}

impl Palette {
    pub fn color_of(&self, sprite: SpriteKind) -> Rgb {
        match sprite {
            SpriteKind::Ground => self.ground,
            SpriteKind::Pipe => self.pipe,
            SpriteKind::Brick => self.brick,
            SpriteKind::Player => self.player,
            SpriteKind::Enemy => self.enemy,
        }
    }
}

/// Describe the session's current state in camera space.
pub fn build_snapshot(session: &GameSession, palette: &Palette) -> FrameSnapshot {
    let camera = session.camera();
    let level = session.level();
    let mut drawables = Vec::with_capacity(level.colliders().len() + session.enemies().len() + 1);

    for (rect, kind) in level.solids() {
        let Some(sprite) = TileKind::sprite(kind) else {
            continue;
        };
        drawables.push(Drawable {
            rect: camera.to_screen(rect),
            sprite,
            color: palette.color_of(sprite),
        });
    }

    drawables.push(Drawable {
        rect: camera.to_screen(session.player().rect()),
        sprite: SpriteKind::Player,
        color: palette.player,
    });

    for enemy in session.enemies() {
        drawables.push(Drawable {
            rect: camera.to_screen(enemy.rect()),
            sprite: SpriteKind::Enemy,
            color: palette.enemy,
        });
    }

    FrameSnapshot {
        tick: session.tick_count(),
        state: session.state(),
        camera_offset_x: camera.offset_x(),
        background: palette.sky,
        drawables,
    }
}
