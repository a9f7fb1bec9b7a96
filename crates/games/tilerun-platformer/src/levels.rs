//! Built-in levels.

use crate::level::{LevelData, TILE_SIZE, Tile, TileKind, TileRun};

/// Grid row of the main floor.
pub const FLOOR_ROW: i32 = 13;

/// World 1-1: a 60-cell floor, two pipes, a brick pair, and one walker.
pub fn level_1_1() -> LevelData {
    LevelData {
        name: "1-1".to_string(),
        player_spawn: [100.0, 100.0],
        runs: vec![TileRun {
            x: 0,
            y: FLOOR_ROW * TILE_SIZE,
            len: 60,
            kind: TileKind::Ground,
        }],
        cells: vec![
            Tile::at(10, 10, TileKind::Pipe),
            Tile::at(20, 8, TileKind::Pipe),
            Tile::at(15, 9, TileKind::Brick),
            Tile::at(16, 9, TileKind::Brick),
            Tile::at(18, 12, TileKind::EnemySpawn),
        ],
    }
}

/// Every built-in level, in play order.
pub fn campaign() -> Vec<LevelData> {
    vec![level_1_1()]
}
