use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::level::{LevelData, Tile, TileKind};
use crate::levels::FLOOR_ROW;

/// Chunk width in cells (each procedural section is this wide).
const CHUNK_WIDTH: i32 = 12;
/// Number of chunks in a generated level.
const NUM_CHUNKS: i32 = 6;
/// Level width in cells.
pub const LEVEL_WIDTH: i32 = CHUNK_WIDTH * NUM_CHUNKS;
/// Row used for floating brick runs.
const BRICK_ROW: i32 = 9;

/// Generate a deterministic level from a seed.
///
/// The first chunk is always flat floor so the default player spawn lands
/// safely. Cells are emitted floor first, then pipes top-down, then bricks,
/// then spawns, which keeps stacked pipes resolving against their top cell.
pub fn generate_level(seed: u64) -> LevelData {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut floor = vec![true; LEVEL_WIDTH as usize];
    let mut pipes = Vec::new();
    let mut bricks = Vec::new();
    let mut spawns = Vec::new();

    for chunk_idx in 1..NUM_CHUNKS {
        let base = chunk_idx * CHUNK_WIDTH;
        match rng.random_range(0u8..5) {
            0 => {
                // Pit
                let start = base + rng.random_range(4..7);
                let width = rng.random_range(2..4);
                for col in start..start + width {
                    floor[col as usize] = false;
                }
            },
            1 => {
                // Pipe, one or two cells tall
                let col = base + rng.random_range(3..9);
                let height = rng.random_range(1..=2);
                for row in (FLOOR_ROW - height)..FLOOR_ROW {
                    pipes.push(Tile::at(col, row, TileKind::Pipe));
                }
            },
            2 => {
                // Brick run overhead
                let start = base + rng.random_range(3..7);
                let len = rng.random_range(2..5);
                for col in start..start + len {
                    bricks.push(Tile::at(col, BRICK_ROW, TileKind::Brick));
                }
            },
            3 => {
                // Walkers on open floor
                let count = rng.random_range(1..=2);
                for i in 0..count {
                    let col = base + 3 + i * 4 + rng.random_range(0..2);
                    spawns.push(Tile::at(col, FLOOR_ROW - 1, TileKind::EnemySpawn));
                }
            },
            _ => {
                // Bricks with a walker underneath
                let start = base + rng.random_range(2..6);
                for col in start..start + 3 {
                    bricks.push(Tile::at(col, BRICK_ROW, TileKind::Brick));
                }
                spawns.push(Tile::at(start + 1, FLOOR_ROW - 1, TileKind::EnemySpawn));
            },
        }
    }

    let mut cells: Vec<Tile> = floor
        .iter()
        .enumerate()
        .filter(|&(_, &solid)| solid)
        .map(|(col, _)| Tile::at(col as i32, FLOOR_ROW, TileKind::Ground))
        .collect();
    cells.extend(pipes);
    cells.extend(bricks);
    cells.extend(spawns);

    LevelData::new(format!("generated-{seed}"), cells)
}
