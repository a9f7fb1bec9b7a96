use std::fmt;

/// Why a level cell was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellDefect {
    Negative,
    Misaligned { tile_size: i32 },
    /// The cell's far edge does not fit in world coordinates.
    OutOfRange,
}

/// Why a run of cells was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunDefect {
    TooLong { max: u32 },
    /// Some cell of the run lies outside world coordinates.
    OutOfRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    /// A cell has negative or off-grid coordinates.
    InvalidLevelData {
        index: usize,
        x: i32,
        y: i32,
        defect: CellDefect,
    },
    /// A run's length or extent cannot be expanded into cells.
    InvalidRun {
        index: usize,
        len: u32,
        defect: RunDefect,
    },
    /// A campaign level failed to load.
    InLevel {
        level: usize,
        name: String,
        source: Box<LevelError>,
    },
    /// The configured tile size cannot form a grid.
    InvalidTileSize(i32),
    /// A session was given no levels to play.
    EmptyCampaign,
    /// Level text could not be parsed.
    Parse(String),
    /// A generated-level seed is not an unsigned integer.
    InvalidSeed { value: String, message: String },
    /// A level file could not be read.
    Io { path: String, message: String },
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLevelData {
                index,
                x,
                y,
                defect,
            } => match defect {
                CellDefect::Negative => {
                    write!(f, "invalid level data: cell {index} at ({x}, {y}) is negative")
                },
                CellDefect::Misaligned { tile_size } => write!(
                    f,
                    "invalid level data: cell {index} at ({x}, {y}) is not aligned to the {tile_size}-unit grid"
                ),
                CellDefect::OutOfRange => write!(
                    f,
                    "invalid level data: cell {index} at ({x}, {y}) extends past the world limit"
                ),
            },
            Self::InvalidRun { index, len, defect } => match defect {
                RunDefect::TooLong { max } => write!(
                    f,
                    "invalid level data: run {index} has {len} cells, at most {max} allowed"
                ),
                RunDefect::OutOfRange => write!(
                    f,
                    "invalid level data: run {index} of {len} cells extends past the world limit"
                ),
            },
            Self::InLevel {
                level,
                name,
                source,
            } => write!(f, "level {level} ({name}): {source}"),
            Self::InvalidTileSize(size) => write!(f, "tile size must be positive, got {size}"),
            Self::EmptyCampaign => write!(f, "campaign has no levels"),
            Self::Parse(e) => write!(f, "level parse error: {e}"),
            Self::InvalidSeed { value, message } => {
                write!(f, "invalid level seed {value:?}: {message}")
            },
            Self::Io { path, message } => write!(f, "failed to read level {path}: {message}"),
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InLevel { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_cell() {
        let err = LevelError::InvalidLevelData {
            index: 3,
            x: 5,
            y: 0,
            defect: CellDefect::Misaligned { tile_size: 16 },
        };
        assert_eq!(
            err.to_string(),
            "invalid level data: cell 3 at (5, 0) is not aligned to the 16-unit grid"
        );

        let err = LevelError::InvalidLevelData {
            index: 0,
            x: -16,
            y: 0,
            defect: CellDefect::Negative,
        };
        assert!(err.to_string().contains("negative"));
    }

    #[test]
    fn campaign_errors_name_the_level() {
        use std::error::Error;

        let inner = LevelError::InvalidLevelData {
            index: 0,
            x: 5,
            y: 0,
            defect: CellDefect::Misaligned { tile_size: 16 },
        };
        let err = LevelError::InLevel {
            level: 2,
            name: "castle".to_string(),
            source: Box::new(inner.clone()),
        };
        assert_eq!(
            err.to_string(),
            "level 2 (castle): invalid level data: cell 0 at (5, 0) is not aligned to the 16-unit grid"
        );
        assert_eq!(err.source().map(|s| s.to_string()), Some(inner.to_string()));
    }
}
