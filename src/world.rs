use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::renderer::Rgb;

/// Built-in level, indexed `[x][y]`. Zero is open floor, anything else is a wall.
pub const DEFAULT_MAP: [[u8; 24]; 24] = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 2, 2, 2, 2, 2, 0, 0, 0, 0, 3, 0, 3, 0, 3, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 2, 0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 2, 0, 0, 0, 2, 0, 0, 0, 0, 3, 0, 0, 0, 3, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 2, 0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 2, 2, 0, 2, 2, 0, 0, 0, 0, 3, 0, 3, 0, 3, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 4, 4, 4, 4, 4, 4, 4, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 4, 0, 4, 0, 0, 0, 0, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 4, 0, 0, 0, 0, 5, 0, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 4, 0, 4, 0, 0, 0, 0, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 4, 0, 4, 4, 4, 4, 4, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 4, 4, 4, 4, 4, 4, 4, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

/// Wall material, selected by the cell code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Material {
    Red,
    Green,
    Blue,
    White,
    /// Any positive code without a dedicated entry.
    Fallback,
}

impl Material {
    /// `None` for open floor.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => None,
            1 => Some(Material::Red),
            2 => Some(Material::Green),
            3 => Some(Material::Blue),
            4 => Some(Material::White),
            _ => Some(Material::Fallback),
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            Material::Red => Rgb::new(255, 0, 0),
            Material::Green => Rgb::new(0, 255, 0),
            Material::Blue => Rgb::new(0, 0, 255),
            Material::White => Rgb::new(255, 255, 255),
            Material::Fallback => Rgb::new(255, 255, 0),
        }
    }
}

/// Errors raised while building or loading a map.
#[derive(Debug)]
pub enum MapError {
    /// No cells at all.
    Empty,
    /// Column `x` has a different length than column 0.
    Ragged { x: usize, expected: usize, found: usize },
    /// Fewer than 3 cells along an axis leaves no interior.
    TooSmall { width: usize, height: usize },
    /// A cell on the outer ring is open.
    OpenBoundary { x: usize, y: usize },
    /// Spawn point is outside the interior of the grid.
    SpawnOutside { x: f64, y: f64 },
    /// Spawn point sits inside a wall cell.
    SpawnInWall { x: f64, y: f64 },
    IoError(std::io::Error),
    JsonError(serde_json::Error),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::Empty => write!(f, "map has no cells"),
            MapError::Ragged { x, expected, found } => {
                write!(f, "map column {x} has {found} cells, expected {expected}")
            }
            MapError::TooSmall { width, height } => {
                write!(f, "map is {width}x{height}, needs at least 3x3")
            }
            MapError::OpenBoundary { x, y } => {
                write!(f, "map boundary is open at ({x}, {y})")
            }
            MapError::SpawnOutside { x, y } => {
                write!(f, "spawn point ({x}, {y}) is outside the map interior")
            }
            MapError::SpawnInWall { x, y } => {
                write!(f, "spawn point ({x}, {y}) is inside a wall")
            }
            MapError::IoError(e) => write!(f, "IO error: {e}"),
            MapError::JsonError(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for MapError {}

impl From<std::io::Error> for MapError {
    fn from(e: std::io::Error) -> Self {
        MapError::IoError(e)
    }
}

impl From<serde_json::Error> for MapError {
    fn from(e: serde_json::Error) -> Self {
        MapError::JsonError(e)
    }
}

/// On-disk layout of a map file: `{"cells": [[1, 1, 1], [1, 0, 1], [1, 1, 1]]}`.
#[derive(Deserialize)]
struct MapFile {
    cells: Vec<Vec<u8>>,
}

/// Rectangular grid of cell codes with a closed outer ring.
///
/// The closed ring is checked once at construction, so ray traversal and
/// movement never need to clamp their indices.
#[derive(Debug, Clone)]
pub struct GridMap {
    width: usize,
    height: usize,
    cells: Vec<u8>, // column-major, cells[x * height + y]
}

impl GridMap {
    pub fn from_columns(columns: Vec<Vec<u8>>) -> Result<Self, MapError> {
        let width = columns.len();
        let height = columns.first().map_or(0, Vec::len);
        if width == 0 || height == 0 {
            return Err(MapError::Empty);
        }
        if let Some((x, col)) = columns.iter().enumerate().find(|(_, c)| c.len() != height) {
            return Err(MapError::Ragged {
                x,
                expected: height,
                found: col.len(),
            });
        }
        if width < 3 || height < 3 {
            return Err(MapError::TooSmall { width, height });
        }

        let map = Self {
            width,
            height,
            cells: columns.into_iter().flatten().collect(),
        };
        map.check_closed()?;
        Ok(map)
    }

    pub fn builtin() -> Self {
        // DEFAULT_MAP is closed; covered by tests.
        Self {
            width: DEFAULT_MAP.len(),
            height: DEFAULT_MAP[0].len(),
            cells: DEFAULT_MAP.iter().flatten().copied().collect(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, MapError> {
        let text = fs::read_to_string(path)?;
        let file: MapFile = serde_json::from_str(&text)?;
        let map = Self::from_columns(file.cells)?;
        log::debug!(
            "loaded {}x{} map from {}",
            map.width,
            map.height,
            path.display()
        );
        Ok(map)
    }

    fn check_closed(&self) -> Result<(), MapError> {
        let (w, h) = (self.width, self.height);
        let ring = (0..w)
            .flat_map(|x| [(x, 0), (x, h - 1)])
            .chain((0..h).flat_map(|y| [(0, y), (w - 1, y)]));
        for (x, y) in ring {
            if self.cell_at(x, y) == 0 {
                return Err(MapError::OpenBoundary { x, y });
            }
        }
        Ok(())
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell code at integer grid coordinates. Callers stay in bounds by
    /// starting inside the closed ring.
    #[inline]
    pub fn cell_at(&self, x: usize, y: usize) -> u8 {
        debug_assert!(x < self.width && y < self.height);
        self.cells[x * self.height + y]
    }

    /// Whether the cell containing the fractional point is open floor.
    /// Points outside the grid count as solid.
    pub fn is_open_at(&self, x: f64, y: f64) -> bool {
        if x < 0.0 || y < 0.0 {
            return false;
        }
        let (cx, cy) = (x as usize, y as usize);
        cx < self.width && cy < self.height && self.cell_at(cx, cy) == 0
    }

    /// Rejects a camera start that would let traversal leave the grid.
    pub fn validate_spawn(&self, pos: [f64; 2]) -> Result<(), MapError> {
        let [x, y] = pos;
        let inside = x >= 1.0
            && y >= 1.0
            && x < (self.width - 1) as f64
            && y < (self.height - 1) as f64;
        if !inside {
            return Err(MapError::SpawnOutside { x, y });
        }
        if !self.is_open_at(x, y) {
            return Err(MapError::SpawnInWall { x, y });
        }
        Ok(())
    }
}
