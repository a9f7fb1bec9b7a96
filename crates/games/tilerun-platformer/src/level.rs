use std::path::Path;

use serde::{Deserialize, Serialize};

use tilerun_core::frame::SpriteKind;
use tilerun_core::geometry::Rect;

use crate::enemy::{ENEMY_HEIGHT, ENEMY_SPEED, ENEMY_WIDTH, Enemy};
use crate::error::{CellDefect, LevelError, RunDefect};

/// Edge length of one grid cell in world units.
pub const TILE_SIZE: i32 = 16;

/// Longest run a level file may declare.
pub const MAX_RUN_LEN: u32 = 4096;

/// Cell kinds in level data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Ground,
    Pipe,
    Brick,
    #[serde(alias = "goomba")]
    EnemySpawn,
    /// Any kind this version does not know. Ignored by the loader.
    #[serde(other)]
    Other,
}

impl TileKind {
    pub fn is_collider(self) -> bool {
        matches!(self, TileKind::Ground | TileKind::Pipe | TileKind::Brick)
    }

    pub fn sprite(self) -> Option<SpriteKind> {
        match self {
            TileKind::Ground => Some(SpriteKind::Ground),
            TileKind::Pipe => Some(SpriteKind::Pipe),
            TileKind::Brick => Some(SpriteKind::Brick),
            TileKind::EnemySpawn | TileKind::Other => None,
        }
    }
}

/// One grid cell of level data. `(x, y)` is the top-left corner in world units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
    pub kind: TileKind,
}

impl Tile {
    pub const fn new(x: i32, y: i32, kind: TileKind) -> Self {
        Self { x, y, kind }
    }

    /// Cell at grid column `col`, row `row`.
    pub const fn at(col: i32, row: i32, kind: TileKind) -> Self {
        Self::new(col * TILE_SIZE, row * TILE_SIZE, kind)
    }
}

/// Horizontal run of identical cells, shorthand for long floors in level files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRun {
    pub x: i32,
    pub y: i32,
    pub len: u32,
    pub kind: TileKind,
}

/// Grid and enemy parameters used while loading, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelRules {
    pub tile_size: i32,
    pub enemy_width: f32,
    pub enemy_height: f32,
    pub enemy_speed: f32,
}

impl Default for LevelRules {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            enemy_width: ENEMY_WIDTH,
            enemy_height: ENEMY_HEIGHT,
            enemy_speed: ENEMY_SPEED,
        }
    }
}

/// Horizontal extent of a level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub min_x: f32,
    pub max_x: f32,
}

/// A loaded level: static colliders in data order, the initial enemy roster,
/// and world bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    colliders: Vec<Rect>,
    collider_kinds: Vec<TileKind>,
    enemies: Vec<Enemy>,
    bounds: WorldBounds,
}

impl Level {
    /// Static collision rectangles in level order.
    pub fn colliders(&self) -> &[Rect] {
        &self.colliders
    }

    /// Colliders paired with the kind they were built from.
    pub fn solids(&self) -> impl Iterator<Item = (&Rect, TileKind)> {
        self.colliders
            .iter()
            .zip(self.collider_kinds.iter().copied())
    }

    /// Enemies as spawned, in level order.
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn bounds(&self) -> WorldBounds {
        self.bounds
    }
}

/// Build a level from cells with the default grid and enemy parameters.
pub fn load_level(cells: &[Tile]) -> Result<Level, LevelError> {
    load_level_with(cells, &LevelRules::default())
}

/// Build a level from cells.
///
/// Deterministic and order-preserving: colliders and enemies come out in the
/// order their cells appear. Every cell is validated, including kinds the
/// loader otherwise ignores.
pub fn load_level_with(cells: &[Tile], rules: &LevelRules) -> Result<Level, LevelError> {
    let size = rules.tile_size;
    if size <= 0 {
        return Err(LevelError::InvalidTileSize(size));
    }

    let mut colliders = Vec::new();
    let mut collider_kinds = Vec::new();
    let mut enemies = Vec::new();
    let mut min_x = i32::MAX;
    let mut max_x = i32::MIN;

    for (index, cell) in cells.iter().enumerate() {
        let right = validate_cell(index, cell, size)?;
        min_x = min_x.min(cell.x);
        max_x = max_x.max(right);

        match cell.kind {
            kind if kind.is_collider() => {
                colliders.push(Rect::cell(cell.x, cell.y, size));
                collider_kinds.push(kind);
            },
            TileKind::EnemySpawn => enemies.push(Enemy::new(
                cell.x as f32,
                cell.y as f32,
                rules.enemy_width,
                rules.enemy_height,
                rules.enemy_speed,
            )),
            _ => {},
        }
    }

    let bounds = if cells.is_empty() {
        WorldBounds::default()
    } else {
        WorldBounds {
            min_x: min_x as f32,
            max_x: max_x as f32,
        }
    };

    Ok(Level {
        colliders,
        collider_kinds,
        enemies,
        bounds,
    })
}

/// Check a cell and return its right edge.
fn validate_cell(index: usize, cell: &Tile, size: i32) -> Result<i32, LevelError> {
    let defect = if cell.x < 0 || cell.y < 0 {
        CellDefect::Negative
    } else if cell.x % size != 0 || cell.y % size != 0 {
        CellDefect::Misaligned { tile_size: size }
    } else if let (Some(right), Some(_)) = (cell.x.checked_add(size), cell.y.checked_add(size)) {
        return Ok(right);
    } else {
        CellDefect::OutOfRange
    };
    Err(LevelError::InvalidLevelData {
        index,
        x: cell.x,
        y: cell.y,
        defect,
    })
}

fn default_level_name() -> String {
    "untitled".to_string()
}

fn default_player_spawn() -> [f32; 2] {
    [100.0, 100.0]
}

/// Declarative level description as stored in TOML or JSON files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    #[serde(default = "default_level_name")]
    pub name: String,
    /// Top-left of the player body at level start.
    #[serde(default = "default_player_spawn")]
    pub player_spawn: [f32; 2],
    /// Expanded before `cells`, in order.
    #[serde(default)]
    pub runs: Vec<TileRun>,
    #[serde(default)]
    pub cells: Vec<Tile>,
}

impl LevelData {
    pub fn new(name: impl Into<String>, cells: Vec<Tile>) -> Self {
        Self {
            name: name.into(),
            player_spawn: default_player_spawn(),
            runs: Vec::new(),
            cells,
        }
    }

    /// All cells with runs expanded, runs first.
    ///
    /// Runs longer than [`MAX_RUN_LEN`] or reaching past `i32::MAX` are rejected
    /// before anything is allocated for them.
    pub fn expanded_cells(&self, tile_size: i32) -> Result<Vec<Tile>, LevelError> {
        let mut cells = Vec::with_capacity(self.cells.len());
        for (index, run) in self.runs.iter().enumerate() {
            let invalid = |defect| LevelError::InvalidRun {
                index,
                len: run.len,
                defect,
            };
            if run.len > MAX_RUN_LEN {
                return Err(invalid(RunDefect::TooLong { max: MAX_RUN_LEN }));
            }
            // len <= MAX_RUN_LEN, so the conversion cannot fail
            let len = i32::try_from(run.len)
                .map_err(|_| invalid(RunDefect::TooLong { max: MAX_RUN_LEN }))?;
            // every cell lies between the first and last, so checking the last is enough
            let last = (len - 1)
                .max(0)
                .checked_mul(tile_size)
                .and_then(|offset| run.x.checked_add(offset));
            if last.is_none() {
                return Err(invalid(RunDefect::OutOfRange));
            }
            cells.extend((0..len).map(|i| Tile::new(run.x + i * tile_size, run.y, run.kind)));
        }
        cells.extend(self.cells.iter().copied());
        Ok(cells)
    }

    pub fn load(&self, rules: &LevelRules) -> Result<Level, LevelError> {
        load_level_with(&self.expanded_cells(rules.tile_size)?, rules)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, LevelError> {
        toml::from_str(text).map_err(|e| LevelError::Parse(e.to_string()))
    }

    pub fn from_json_str(text: &str) -> Result<Self, LevelError> {
        serde_json::from_str(text).map_err(|e| LevelError::Parse(e.to_string()))
    }

    /// Read a level file, picking the format from the extension (`.json`, else TOML).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| LevelError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_toml_str(&text)
        }
    }
}
