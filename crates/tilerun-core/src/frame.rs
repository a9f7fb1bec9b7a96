//! Post-tick output handed to the rendering collaborator.
//!
//! The core never draws; it describes what is on screen in camera space and
//! lets the renderer decide how to paint it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::state::GameState;

/// 24-bit colour, written as `#RRGGBB` in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (the leading `#` is optional).
    pub fn parse_hex(s: &str) -> Result<Self, ColorParseError> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ColorParseError(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ColorParseError(s.to_string()))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError(pub String);

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid colour {:?}, expected #RRGGBB", self.0)
    }
}

impl std::error::Error for ColorParseError {}

/// Styling key for a drawable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpriteKind {
    Ground,
    Pipe,
    Brick,
    Player,
    Enemy,
}

/// One rectangle to draw, already shifted into camera space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Drawable {
    pub rect: Rect,
    pub sprite: SpriteKind,
    pub color: Rgb,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub state: GameState,
    pub camera_offset_x: f32,
    pub background: Rgb,
    /// Tiles first (level order), then the player, then enemies (roster order).
    pub drawables: Vec<Drawable>,
}

impl FrameSnapshot {
    pub fn of_kind(&self, sprite: SpriteKind) -> impl Iterator<Item = &Drawable> {
        self.drawables.iter().filter(move |d| d.sprite == sprite)
    }
}

/// Rendering collaborator. Receives only post-tick state.
pub trait Renderer {
    fn present(&mut self, frame: &FrameSnapshot);
}
