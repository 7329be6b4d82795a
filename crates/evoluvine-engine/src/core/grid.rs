use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::GridError;

/// A grid cell, addressed by the pixel coordinates of its top-left corner.
///
/// Cells that belong to a [`Grid`] are always aligned to its cell size, so
/// `(100, 100)` and `(120, 100)` are horizontal neighbors on a grid with
/// 20-pixel cells.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the cell displaced by `(dx, dy)` pixels.
    #[must_use]
    pub const fn offset(self, (dx, dy): (i32, i32)) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Manhattan distance in pixels.
    #[must_use]
    pub const fn manhattan_distance(self, other: Self) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// Bounded playing field measured in pixels and divided into square cells.
///
/// Valid cells satisfy `0 <= x < width` and `0 <= y < height`. Construction
/// guarantees that both dimensions are positive multiples of the cell size.
///
/// # Example
///
/// ```
/// use evoluvine_engine::{Cell, Grid};
///
/// let grid = Grid::new(800, 600, 20).unwrap();
/// assert_eq!(grid.center(), Cell::new(400, 300));
/// assert!(grid.contains(Cell::new(780, 580)));
/// assert!(!grid.contains(Cell::new(800, 0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridDimensions", into = "GridDimensions")]
pub struct Grid {
    width: i32,
    height: i32,
    cell_size: i32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct GridDimensions {
    width: i32,
    height: i32,
    cell_size: i32,
}

impl TryFrom<GridDimensions> for Grid {
    type Error = GridError;

    fn try_from(dims: GridDimensions) -> Result<Self, Self::Error> {
        Grid::new(dims.width, dims.height, dims.cell_size)
    }
}

impl From<Grid> for GridDimensions {
    fn from(grid: Grid) -> Self {
        Self {
            width: grid.width,
            height: grid.height,
            cell_size: grid.cell_size,
        }
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Grid {
    /// 800×600 pixels with 20-pixel cells.
    pub const DEFAULT: Self = Self {
        width: 800,
        height: 600,
        cell_size: 20,
    };

    pub fn new(width: i32, height: i32, cell_size: i32) -> Result<Self, GridError> {
        if width <= 0 || height <= 0 || cell_size <= 0 {
            return Err(GridError::NonPositive {
                width,
                height,
                cell_size,
            });
        }
        if width % cell_size != 0 || height % cell_size != 0 {
            return Err(GridError::Unaligned {
                width,
                height,
                cell_size,
            });
        }
        Ok(Self {
            width,
            height,
            cell_size,
        })
    }

    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    #[must_use]
    pub const fn cell_size(&self) -> i32 {
        self.cell_size
    }

    #[must_use]
    pub const fn columns(&self) -> i32 {
        self.width / self.cell_size
    }

    #[must_use]
    pub const fn rows(&self) -> i32 {
        self.height / self.cell_size
    }

    #[must_use]
    pub const fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    /// Cell closest to the middle of the grid, aligned to the cell size.
    #[must_use]
    pub const fn center(&self) -> Cell {
        Cell::new(
            self.columns() / 2 * self.cell_size,
            self.rows() / 2 * self.cell_size,
        )
    }

    /// Length of the grid diagonal in pixels.
    ///
    /// Used to normalize distances into `[0, 1]`.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn max_distance(&self) -> f32 {
        f32::hypot(self.width as f32, self.height as f32)
    }

    /// Coarse zone containing `cell`, where a zone spans `zone_cells` cells on each axis.
    #[must_use]
    pub const fn zone_of(&self, cell: Cell, zone_cells: i32) -> (i32, i32) {
        let span = self.cell_size * zone_cells;
        (cell.x.div_euclid(span), cell.y.div_euclid(span))
    }

    /// Picks a uniformly random cell at least `margin` cells away from every edge.
    ///
    /// When the grid is too small for the margin, the whole grid is used.
    pub fn random_cell<R>(&self, rng: &mut R, margin: i32) -> Cell
    where
        R: Rng + ?Sized,
    {
        let pick = |rng: &mut R, count: i32| {
            let (lo, hi) = if margin <= count - 1 - margin {
                (margin, count - 1 - margin)
            } else {
                (0, count - 1)
            };
            rng.random_range(lo..=hi)
        };
        let x = pick(rng, self.columns());
        let y = pick(rng, self.rows());
        Cell::new(x * self.cell_size, y * self.cell_size)
    }
}
