//! Level grid, loaded once from a text file.
//!
//! The file holds `<width> <height>` followed by `width * height` integer
//! cell codes in row-major order. Row 0 is the top row of the maze.

use std::fs;
use std::io;
use std::path::Path;

use tracing::info;
use vek::Vec2;

use crate::error::LevelLoadError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Tunnel,
    Wall,
    PacmanSpawn,
    GhostSpawn,
    Pellet,
}

impl Cell {
    pub fn from_code(code: i64) -> Option<Cell> {
        match code {
            0 => Some(Cell::Tunnel),
            1 => Some(Cell::Wall),
            2 => Some(Cell::PacmanSpawn),
            3 => Some(Cell::GhostSpawn),
            4 => Some(Cell::Pellet),
            _ => None,
        }
    }

}

/// Immutable level grid. `index = y * width + x`, with `y` counting rows
/// from the top of the file.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Level {
    pub fn load(path: impl AsRef<Path>) -> Result<Level, LevelLoadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                LevelLoadError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                LevelLoadError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        let level = Level::parse(&text)?;
        info!(
            path = %path.display(),
            width = level.width,
            height = level.height,
            "loaded level"
        );
        Ok(level)
    }

    pub fn parse(text: &str) -> Result<Level, LevelLoadError> {
        let tokens = text
            .split_whitespace()
            .enumerate()
            .map(|(index, token)| {
                token.parse::<i64>().map_err(|_| LevelLoadError::Malformed {
                    index,
                    token: token.to_owned(),
                })
            })
            .collect::<Result<Vec<i64>, _>>()?;

        let (width, height) = match tokens.as_slice() {
            [w, h, ..] => (*w, *h),
            _ => {
                return Err(LevelLoadError::SizeMismatch {
                    expected: 2,
                    found: tokens.len(),
                })
            }
        };
        if width <= 0 || height <= 0 {
            return Err(LevelLoadError::InvalidDimensions { width, height });
        }

        let width = width as usize;
        let height = height as usize;
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_add(2))
            .ok_or(LevelLoadError::InvalidDimensions {
                width: width as i64,
                height: height as i64,
            })?;
        if tokens.len() != expected {
            return Err(LevelLoadError::SizeMismatch {
                expected,
                found: tokens.len(),
            });
        }

        let cells = tokens[2..]
            .iter()
            .enumerate()
            .map(|(index, &code)| {
                Cell::from_code(code).ok_or(LevelLoadError::UnknownCell { index, code })
            })
            .collect::<Result<Vec<Cell>, _>>()?;

        Ok(Level {
            width,
            height,
            cells,
        })
    }

    /// Cell at `(x, y)`. Out of range coordinates read the nearest border
    /// cell.
    pub fn get(&self, x: i32, y: i32) -> Cell {
        let x = x.clamp(0, self.width as i32 - 1) as usize;
        let y = y.clamp(0, self.height as i32 - 1) as usize;
        self.cells[y * self.width + x]
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Every cell with its grid coordinates, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &cell)| (i % self.width, i / self.width, cell))
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// World position of the centre of grid cell `(x, y)`. World y points up.
    pub fn to_world(&self, x: usize, y: usize) -> Vec2<f32> {
        Vec2::new(x as f32, (self.height - 1 - y) as f32)
    }

    /// Lower-left and upper-right world corners of the level.
    pub fn bounds(&self) -> Bounds {
        Bounds {
            min: Vec2::new(0.0, 0.0),
            max: Vec2::new((self.width - 1) as f32, (self.height - 1) as f32),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2<f32>,
    pub max: Vec2<f32>,
}

impl Bounds {
    pub fn contains(&self, pos: Vec2<f32>) -> bool {
        pos.x >= self.min.x && pos.y >= self.min.y && pos.x <= self.max.x && pos.y <= self.max.y
    }
}
